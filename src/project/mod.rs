//! Project storage orchestration.
//!
//! Everything that touches the filesystem or the central store lives here:
//! discovering existing subject/session folders (index), creating folder
//! trees (folders) and driving the external rclone transfer tool (transfer).

pub(crate) mod folders;
pub(crate) mod index;
pub(crate) mod transfer;
