use std::time::Duration;

/// How often and at what pace a Peer probes the other Peers
pub trait ProbeSchedule {
    /// Check if another probe should be send
    fn should_probe(&mut self) -> bool;

    /// The time that should be waited after a probe, where [`None`] represents no waiting time
    fn wait_time(&mut self) -> Option<Duration>;
}

/// Provides a flexible structure to construct a Schedule based on custom functions for
/// determining if another probe should happen and what the delay after it should be
pub struct Schedule<F, D> {
    filter: F,
    delay: D,
}

impl<F, D> ProbeSchedule for Schedule<F, D>
where
    F: FnMut() -> bool,
    D: FnMut() -> Option<Duration>,
{
    fn should_probe(&mut self) -> bool {
        (self.filter)()
    }

    fn wait_time(&mut self) -> Option<Duration> {
        (self.delay)()
    }
}

impl Schedule<(), ()> {
    /// Allows for a custom construction based on the provided functions
    pub fn custom<F, D>(filter: F, delay: D) -> Schedule<F, D>
    where
        F: FnMut() -> bool,
        D: FnMut() -> Option<Duration>,
    {
        Schedule { filter, delay }
    }

    /// Probes forever and always waits a constant time after every probe
    pub fn unlimited_constant(
        constant: Duration,
    ) -> Schedule<impl FnMut() -> bool, impl FnMut() -> Option<Duration>> {
        Schedule {
            filter: move || true,
            delay: move || Some(constant),
        }
    }

    /// Sends the given number of probes and always waits a constant time after every probe
    pub fn limit_constant(
        limit: usize,
        constant: Duration,
    ) -> Schedule<impl FnMut() -> bool, impl FnMut() -> Option<Duration>> {
        let mut current: usize = 0;
        Schedule {
            filter: move || {
                current = current.saturating_add(1);
                current <= limit
            },
            delay: move || Some(constant),
        }
    }
}

/// Waits according to the Schedule, if there is anything to wait for
pub(crate) async fn pause<S>(schedule: &mut S)
where
    S: ProbeSchedule + ?Sized,
{
    if let Some(dur) = schedule.wait_time() {
        tokio::time::sleep(dur).await;
    }
}
