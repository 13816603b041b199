//! Recording [`CommandRunner`] for command-construction tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use deckhand_core::{CommandRunner, CommandSpec, ExecError};

#[derive(Default)]
pub(crate) struct Recorder {
    pub specs: Mutex<Vec<CommandSpec>>,
    outputs: Mutex<VecDeque<Result<String, String>>>,
}

impl Recorder {
    /// Queue the next `capture` result; `Err` becomes a spawn failure.
    pub fn push_output(&self, output: Result<&str, &str>) {
        self.outputs
            .lock()
            .unwrap()
            .push_back(output.map(str::to_string).map_err(str::to_string));
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.specs
            .lock()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn next(&self, spec: &CommandSpec) -> Result<String, ExecError> {
        self.specs.lock().unwrap().push(spec.clone());
        let queued = self.outputs.lock().unwrap().pop_front();
        match queued {
            Some(Ok(out)) => Ok(out),
            Some(Err(msg)) => Err(ExecError::Spawn {
                program: spec.program.display().to_string(),
                cwd: spec.cwd.clone(),
                source: std::io::Error::other(msg),
            }),
            None => Ok(String::new()),
        }
    }
}

impl CommandRunner for Recorder {
    fn run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
        self.next(spec).map(|_| ())
    }

    fn capture(&self, spec: &CommandSpec) -> Result<String, ExecError> {
        self.next(spec)
    }
}
