//! Notification delivery for observers.

use anchor_lang::prelude::*;

use crate::registry::{EntropyRequested, Released, ScheduleCreated};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    ScheduleCreated(ScheduleCreated),
    Released(Released),
    EntropyRequested(EntropyRequested),
}

impl From<ScheduleCreated> for Notification {
    fn from(e: ScheduleCreated) -> Self {
        Notification::ScheduleCreated(e)
    }
}

impl From<Released> for Notification {
    fn from(e: Released) -> Self {
        Notification::Released(e)
    }
}

impl From<EntropyRequested> for Notification {
    fn from(e: EntropyRequested) -> Self {
        Notification::EntropyRequested(e)
    }
}

pub trait EventSink {
    fn publish(&mut self, notification: Notification);
}

/// Writes each notification to the program log as an Anchor event.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgramLogSink;

impl EventSink for ProgramLogSink {
    fn publish(&mut self, notification: Notification) {
        match notification {
            Notification::ScheduleCreated(e) => emit!(e),
            Notification::Released(e) => emit!(e),
            Notification::EntropyRequested(e) => emit!(e),
        }
    }
}

/// Keeps notifications in memory, in publication order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Notification>,
}

impl EventSink for RecordingSink {
    fn publish(&mut self, notification: Notification) {
        self.events.push(notification);
    }
}
