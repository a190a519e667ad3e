//! Operations invoked by the web and command-line front ends.

pub mod split;

pub use split::{
    split_file_to_dir, split_upload, split_upload_async, SplitOptions, SplitOutcome, SplitPart,
};
