//! Contains the Configuration shared by all the Peers in a [`Roster`](crate::Roster)

use std::time::Duration;

/// Controls what a Peer does after it declared itself the leader
///
/// The classic Bully algorithm notifies all the other Peers about the new leader, so that every
/// Peer eventually agrees on the same leader. Without this, the other Peers keep believing in the
/// old leader until they run an election of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Deserialize, ::serde::Serialize))]
pub enum Announcement {
    /// The new leader keeps the result to itself
    Silent,
    /// The new leader announces itself to every lower ranked Peer
    Broadcast,
}

/// The General Configuration that holds all the options
#[derive(Debug, Clone)]
pub struct PeerConfig {
    probe_interval: Duration,
    announcement: Announcement,
}

impl PeerConfig {
    /// Gets the most basic Configuration possible
    ///
    /// # Settings
    /// * Probe Interval of 2 seconds
    /// * [`Announcement::Silent`]
    ///
    /// ```rust
    /// # use std::time::Duration;
    /// # use bully::config::*;
    /// let config = PeerConfig::basic();
    /// assert_eq!(Duration::from_secs(2), config.probe_interval());
    /// assert_eq!(false, config.announces());
    /// ```
    pub fn basic() -> Self {
        Self {
            probe_interval: Duration::from_secs(2),
            announcement: Announcement::Silent,
        }
    }

    /// Same as [`PeerConfig::basic`] but with [`Announcement::Broadcast`]
    ///
    /// ```rust
    /// # use bully::config::*;
    /// let config = PeerConfig::broadcasting();
    /// assert_eq!(true, config.announces());
    /// assert_eq!(&Announcement::Broadcast, config.announcement());
    /// ```
    pub fn broadcasting() -> Self {
        Self::basic().with_announcement(Announcement::Broadcast)
    }

    /// Updates the time waited after every probe
    pub fn with_probe_interval(mut self, value: Duration) -> Self {
        self.probe_interval = value;
        self
    }

    pub fn probe_interval(&self) -> Duration {
        self.probe_interval
    }

    /// Updates the [`Announcement`] setting
    pub fn with_announcement(mut self, value: Announcement) -> Self {
        self.announcement = value;
        self
    }

    pub fn announcement(&self) -> &Announcement {
        &self.announcement
    }

    /// Check if new leaders announce themselves
    pub fn announces(&self) -> bool {
        matches!(self.announcement, Announcement::Broadcast)
    }
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self::basic()
    }
}
