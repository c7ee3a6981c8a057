//! Fake ffmpeg runner shared by the unit tests.

use std::cell::RefCell;
use anyhow::Result;

use crate::error::MediaError;
use crate::ffmpeg::ToolRunner;

/// Records every argument list it is asked to run and touches the output
/// file (last argument) so callers see something on disk.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<Vec<String>>>,
    /// Zero-based index of the call that should exit non-zero
    pub fail_at: Option<usize>,
}

impl RecordingRunner {
    pub fn failing_at(index: usize) -> Self {
        RecordingRunner { fail_at: Some(index), ..Default::default() }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, args: &[String]) -> Result<()> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(args.to_vec());

        if self.fail_at == Some(index) {
            return Err(MediaError::ToolFailed {
                command: args.join(" "),
                exit_code: 1,
                stderr: "simulated failure".to_string(),
            }
            .into());
        }

        if let Some(output) = args.last() {
            std::fs::write(output, b"fake media")?;
        }

        Ok(())
    }
}
