// Copyright (C) 2026 Christopher Eykamp
//
// SPDX-License-Identifier: Apache-2.0

use slog::{o, Drain, Logger};
use std::{boxed::Box, sync::Mutex};

pub fn init(level: slog::Level) {
    let terminal_drain = Mutex::new(slog_term::term_full().filter_level(level)).fuse();
    let terminal_drain = slog_async::Async::new(terminal_drain).build().fuse();

    let log = Logger::root(terminal_drain, o!("version" => crate::version()));

    // The guard must outlive every request handler, so it is kept for
    // the whole process lifetime.
    let guard = slog_scope::set_global_logger(log);
    Box::leak(Box::new(guard));
}
