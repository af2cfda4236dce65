//! Stack driver: fan-out over member drivers
//!
//! Members are called in order on the calling thread. Through the [`Driver`]
//! trait only the last member failure is reported; [`StackDriver::log_each`]
//! and [`StackDriver::close_each`] return every failure.

use crate::core::{Driver, Entry, LoggerError, Result};

pub struct StackDriver {
    channel: String,
    members: Vec<Box<dyn Driver>>,
    ignore_failures: bool,
}

impl StackDriver {
    /// Fan out over `members`. A stack needs at least one member.
    pub fn new(
        channel: impl Into<String>,
        members: Vec<Box<dyn Driver>>,
        ignore_failures: bool,
    ) -> Result<Self> {
        let channel = channel.into();
        if members.is_empty() {
            return Err(LoggerError::empty_stack(channel));
        }
        Ok(Self {
            channel,
            members,
            ignore_failures,
        })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ignores_failures(&self) -> bool {
        self.ignore_failures
    }

    /// Names of the member drivers, in delivery order
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|member| member.name()).collect()
    }

    /// Deliver to every member and collect each failure in member order
    pub fn log_each(&self, entry: &Entry) -> Vec<LoggerError> {
        self.members
            .iter()
            .filter_map(|member| member.log(entry).err())
            .collect()
    }

    /// Close every member and collect each failure in member order
    pub fn close_each(&self) -> Vec<LoggerError> {
        self.members
            .iter()
            .filter_map(|member| member.close().err())
            .collect()
    }

    fn flush_each(&self) -> Vec<LoggerError> {
        self.members
            .iter()
            .filter_map(|member| member.flush().err())
            .collect()
    }
}

/// Keep only the most recent failure
pub(crate) fn last_failure(errors: Vec<LoggerError>) -> Result<()> {
    match errors.into_iter().last() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

impl Driver for StackDriver {
    fn log(&self, entry: &Entry) -> Result<()> {
        let failures = self.log_each(entry);
        if self.ignore_failures {
            return Ok(());
        }
        last_failure(failures)
    }

    fn close(&self) -> Result<()> {
        last_failure(self.close_each())
    }

    fn name(&self) -> &str {
        "stack"
    }

    fn flush(&self) -> Result<()> {
        last_failure(self.flush_each())
    }
}

impl std::fmt::Debug for StackDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackDriver")
            .field("channel", &self.channel)
            .field("members", &self.member_names())
            .field("ignore_failures", &self.ignore_failures)
            .finish()
    }
}
