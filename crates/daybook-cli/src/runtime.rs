// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use time::{Date, OffsetDateTime, UtcOffset};

/// Wall clock for the terminal loop.
///
/// The local offset is read once, before any threads exist; later reads can
/// fail on platforms that refuse to inspect the timezone from a
/// multithreaded process.
pub struct SystemRuntime {
    offset: UtcOffset,
}

impl SystemRuntime {
    pub fn new() -> Self {
        let offset = match UtcOffset::current_local_offset() {
            Ok(offset) => offset,
            Err(error) => {
                tracing::warn!(%error, "local UTC offset unavailable; dates follow UTC");
                UtcOffset::UTC
            }
        };
        Self::with_offset(offset)
    }

    pub fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Default for SystemRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl daybook_tui::AppRuntime for SystemRuntime {
    fn today(&mut self) -> Result<Date> {
        Ok(OffsetDateTime::now_utc().to_offset(self.offset).date())
    }
}
