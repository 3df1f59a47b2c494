//! Integration tests driving the feature-release binary

mod helpers;
mod test_init;
mod test_run;
mod test_version;
