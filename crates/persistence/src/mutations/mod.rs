// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes.
//!
//! Mutations never open transactions themselves; the caller decides the
//! transaction boundary.

pub mod catalog;
pub mod history;
pub mod principals;
pub mod tickets;
