// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! All queries use Diesel DSL. Rows are converted to domain values before
//! they leave this module.

pub mod catalog;
pub mod history;
pub mod principals;
pub mod tickets;
