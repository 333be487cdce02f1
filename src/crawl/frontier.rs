// src/crawl/frontier.rs
// =============================================================================
// The frontier: the queue of URLs still to be fetched.
//
// The crawler only talks to the `Frontier` trait. `MemoryFrontier` is the
// implementation the binary uses: a breadth-first FIFO queue that ignores
// URLs it has already seen, so adding the same link twice is harmless.
//
// Rust concepts:
// - VecDeque: push_back() to enqueue, pop_front() to dequeue (breadth-first)
// - HashSet: O(1) "have we seen this URL before?"
// =============================================================================

use std::collections::{HashSet, VecDeque};

pub trait Frontier {
    fn has_next_url(&self) -> bool;

    /// Dequeues the next URL and counts it as fetched
    fn next_url(&mut self) -> Option<String>;

    /// Enqueues `url` unless it was ever added before
    fn add_url(&mut self, url: &str);

    /// URLs handed out by `next_url` so far
    fn fetched_count(&self) -> usize;

    /// URLs waiting in the queue
    fn len(&self) -> usize;
}

#[derive(Debug, Default)]
pub struct MemoryFrontier {
    queue: VecDeque<String>,
    seen: HashSet<String>,
    fetched: usize,
}

impl MemoryFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Builds a frontier holding the seed URLs, in order
    //
    // Parameters:
    //   seeds: any list of URL strings (Vec<String>, [&str; N], ...)
    //
    // Returns: a frontier where seeds already count as seen, so a page
    //   linking back to a seed won't queue it twice
    pub fn with_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frontier = Self::new();
        for seed in seeds {
            frontier.add_url(seed.as_ref());
        }
        frontier
    }
}

impl Frontier for MemoryFrontier {
    fn has_next_url(&self) -> bool {
        !self.queue.is_empty()
    }

    fn next_url(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.fetched += 1;
        Some(url)
    }

    fn add_url(&mut self, url: &str) {
        // insert() returns false when the URL was already there
        if self.seen.insert(url.to_string()) {
            self.queue.push_back(url.to_string());
        }
    }

    fn fetched_count(&self) -> usize {
        self.fetched
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for the frontier?
//    - The crawl loop is generic over `F: Frontier`
//    - A persistent or prioritized queue can replace MemoryFrontier later
//      without touching the loop
//
// 2. What does `I: IntoIterator<Item = S>, S: AsRef<str>` mean?
//    - `seeds` can be anything we can loop over (Vec, array, iterator)
//    - each item only has to be viewable as a &str (String and &str both are)

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = MemoryFrontier::with_seeds(["http://a.ics.uci.edu/1", "http://a.ics.uci.edu/2"]);
        assert_eq!(frontier.next_url().as_deref(), Some("http://a.ics.uci.edu/1"));
        assert_eq!(frontier.next_url().as_deref(), Some("http://a.ics.uci.edu/2"));
        assert_eq!(frontier.next_url(), None);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut frontier = MemoryFrontier::new();
        frontier.add_url("http://a.ics.uci.edu/");
        frontier.add_url("http://a.ics.uci.edu/");
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_fetched_url_not_requeued() {
        let mut frontier = MemoryFrontier::with_seeds(["http://a.ics.uci.edu/"]);
        frontier.next_url();
        frontier.add_url("http://a.ics.uci.edu/");
        assert!(!frontier.has_next_url());
        assert_eq!(frontier.fetched_count(), 1);
    }
}
