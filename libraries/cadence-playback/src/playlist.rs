//! Playlist collaborator
//!
//! The controller only needs a handful of operations from a playlist: which entry is
//! current, how many entries exist, and what comes next under the repeat policy.
//! [`MediaPlaylist`] is a plain in-memory implementation.

use crate::types::RepeatPolicy;
use rand::{thread_rng, Rng};

/// Ordered list of media identifiers with a current selection
pub trait Playlist {
    fn is_empty(&self) -> bool {
        self.media_count() == 0
    }

    /// Identifier of the selected entry, `None` when nothing is selected
    fn current_media(&self) -> Option<String>;

    /// Index of the selected entry, `None` when nothing is selected
    fn current_index(&self) -> Option<usize>;

    /// Select an entry; out-of-range indices clear the selection
    fn set_current_index(&mut self, index: usize);

    /// Move the selection according to the repeat policy
    ///
    /// Returns the new index, or `None` when the policy has nothing left to play.
    fn advance(&mut self) -> Option<usize>;

    fn media_count(&self) -> usize;

    fn repeat_policy(&self) -> RepeatPolicy;
}

/// In-memory playlist of media identifiers
#[derive(Debug, Clone, Default)]
pub struct MediaPlaylist {
    entries: Vec<String>,
    current: Option<usize>,
    policy: RepeatPolicy,
}

impl MediaPlaylist {
    /// Create a playlist with the first entry selected (if any)
    pub fn new<I, S>(entries: I, policy: RepeatPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        let current = if entries.is_empty() { None } else { Some(0) };
        Self {
            entries,
            current,
            policy,
        }
    }

    /// Append an entry; selects it when nothing was selected
    pub fn push(&mut self, media: impl Into<String>) {
        self.entries.push(media.into());
        if self.current.is_none() {
            self.current = Some(self.entries.len() - 1);
        }
    }

    /// Remove an entry
    ///
    /// Returns `true` when the removed entry was the current one. The caller is then
    /// expected to tell the controller (`remove_current_media`). The selection stays on
    /// the same index, which now holds the following entry, or is cleared if the list
    /// ran out.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.entries.remove(index);

        match self.current {
            Some(current) if current == index => {
                if current >= self.entries.len() {
                    self.current = None;
                }
                true
            }
            Some(current) if current > index => {
                self.current = Some(current - 1);
                false
            }
            _ => false,
        }
    }

    fn random_index(&self) -> Option<usize> {
        let len = self.entries.len();
        match (len, self.current) {
            (0, _) => None,
            (1, _) => Some(0),
            // Avoid replaying the entry that just finished
            (_, Some(current)) => {
                let offset = thread_rng().gen_range(1..len);
                Some((current + offset) % len)
            }
            (_, None) => Some(thread_rng().gen_range(0..len)),
        }
    }
}

impl Playlist for MediaPlaylist {
    fn current_media(&self) -> Option<String> {
        self.current
            .and_then(|index| self.entries.get(index))
            .cloned()
    }

    fn current_index(&self) -> Option<usize> {
        self.current
    }

    fn set_current_index(&mut self, index: usize) {
        self.current = (index < self.entries.len()).then_some(index);
    }

    fn advance(&mut self) -> Option<usize> {
        let len = self.entries.len();
        let next = match self.policy {
            RepeatPolicy::PlayOnce => None,
            RepeatPolicy::OneLoop => self.current.filter(|&index| index < len),
            RepeatPolicy::PlayOrder => {
                let next = self.current.map_or(0, |index| index + 1);
                (next < len).then_some(next)
            }
            RepeatPolicy::ListLoop => {
                if len == 0 {
                    None
                } else {
                    Some(self.current.map_or(0, |index| (index + 1) % len))
                }
            }
            RepeatPolicy::Random => self.random_index(),
        };
        self.current = next;
        next
    }

    fn media_count(&self) -> usize {
        self.entries.len()
    }

    fn repeat_policy(&self) -> RepeatPolicy {
        self.policy
    }
}
