use std::collections::HashMap;

use crossbeam::channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::errors::{DashboardError, Result};
use crate::readers::{spawn_parse, CancelToken, FileSource, ParserConfig};
use crate::types::RowRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Dragging,
    Loading,
}

/// Transient state owned by an [`UploadSurface`]
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub rows: Vec<RowRecord>,
    pub is_dragging: bool,
    pub is_loading: bool,
}

type ErrorCallback = Box<dyn FnMut(&str)>;

struct Completion {
    upload_id: u64,
    file: String,
    result: Result<Vec<RowRecord>>,
}

/// File drop / selection area feeding the CSV parser.
///
/// Parses run on worker threads; their outcomes are applied on the owner's
/// thread by [`UploadSurface::process_completions`] or
/// [`UploadSurface::wait_idle`]. Overlapping uploads are not serialized: the
/// one that completes last owns `rows`.
pub struct UploadSurface {
    config: ParserConfig,
    state: UploadState,
    on_error: Option<ErrorCallback>,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: HashMap<u64, CancelToken>,
    next_upload_id: u64,
    loaded_file: Option<String>,
}

impl Default for UploadSurface {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl UploadSurface {
    pub fn new(config: ParserConfig) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            config,
            state: UploadState::default(),
            on_error: None,
            sender,
            receiver,
            in_flight: HashMap::new(),
            next_upload_id: 0,
            loaded_file: None,
        }
    }

    /// Register the callback receiving parse failure messages
    pub fn with_error_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.state.rows
    }

    /// Consume the surface, keeping the held rows
    pub fn into_rows(self) -> Vec<RowRecord> {
        self.state.rows
    }

    /// Name of the file whose rows are currently held
    pub fn loaded_file(&self) -> Option<&str> {
        self.loaded_file.as_deref()
    }

    pub fn phase(&self) -> UploadPhase {
        if self.state.is_loading {
            UploadPhase::Loading
        } else if self.state.is_dragging {
            UploadPhase::Dragging
        } else {
            UploadPhase::Idle
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn drag_enter(&mut self) {
        self.state.is_dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.state.is_dragging = false;
    }

    /// Drop files on the surface. Only the first one is parsed.
    pub fn drop_files(&mut self, files: Vec<FileSource>) {
        self.state.is_dragging = false;
        self.accept(files);
    }

    /// Files picked through a file dialog. Only the first one is parsed.
    pub fn select_files(&mut self, files: Vec<FileSource>) {
        self.state.is_dragging = false;
        self.accept(files);
    }

    fn accept(&mut self, files: Vec<FileSource>) {
        let Some(file) = files.into_iter().next() else {
            debug!("no file selected");
            return;
        };

        if let Err(e) = file.check_format() {
            self.report_error(&e.to_string());
            return;
        }

        self.begin(file);
    }

    fn begin(&mut self, file: FileSource) {
        if !self.in_flight.is_empty() {
            warn!(
                file = %file.name(),
                in_flight = self.in_flight.len(),
                "upload started while another parse is running; last to finish wins"
            );
        }

        let upload_id = self.next_upload_id;
        self.next_upload_id += 1;

        let sender = self.sender.clone();
        let name = file.name();
        let token = spawn_parse(file, self.config.clone(), move |result| {
            // The surface may have been dropped while parsing.
            let _ = sender.send(Completion {
                upload_id,
                file: name,
                result,
            });
        });

        self.in_flight.insert(upload_id, token);
        self.state.is_loading = true;
    }

    /// Apply every parse that has finished so far, without blocking.
    ///
    /// Returns the number of completions applied.
    pub fn process_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Block until no parse is in flight.
    pub fn wait_idle(&mut self) {
        while !self.in_flight.is_empty() {
            match self.receiver.recv() {
                Ok(completion) => self.apply(completion),
                Err(_) => break,
            }
        }
    }

    /// Ask every running parse to stop. Cancelled parses still complete,
    /// without touching `rows` or calling the error callback.
    pub fn cancel_all(&self) {
        for token in self.in_flight.values() {
            token.cancel();
        }
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight.remove(&completion.upload_id);

        match completion.result {
            Ok(rows) => {
                debug!(file = %completion.file, rows = rows.len(), "upload parsed");
                self.state.rows = rows;
                self.loaded_file = Some(completion.file);
            }
            Err(DashboardError::Cancelled) => {
                debug!(file = %completion.file, "upload cancelled");
            }
            Err(e) => {
                warn!(file = %completion.file, error = %e, "failed to parse upload");
                self.report_error(&e.to_string());
            }
        }

        if self.in_flight.is_empty() {
            self.state.is_loading = false;
        }
    }

    fn report_error(&mut self, message: &str) {
        if let Some(callback) = self.on_error.as_mut() {
            callback(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn csv(name: &str, body: &str) -> FileSource {
        FileSource::from_bytes(name, body.as_bytes().to_vec())
    }

    #[test]
    fn test_initial_state() {
        let surface = UploadSurface::default();
        assert_eq!(surface.phase(), UploadPhase::Idle);
        assert!(surface.rows().is_empty());
        assert!(!surface.state().is_dragging);
        assert!(!surface.state().is_loading);
    }

    #[test]
    fn test_drag_enter_leave() {
        let mut surface = UploadSurface::default();
        surface.drag_enter();
        assert!(surface.state().is_dragging);
        assert_eq!(surface.phase(), UploadPhase::Dragging);
        surface.drag_leave();
        assert!(!surface.state().is_dragging);
        assert_eq!(surface.phase(), UploadPhase::Idle);
    }

    #[test]
    fn test_drop_loads_then_idles() {
        let mut surface = UploadSurface::default();
        surface.drag_enter();
        surface.drop_files(vec![csv("a.csv", "x\n1\n2\n")]);
        assert!(!surface.state().is_dragging);
        assert_eq!(surface.phase(), UploadPhase::Loading);

        surface.wait_idle();
        assert_eq!(surface.phase(), UploadPhase::Idle);
        assert_eq!(surface.rows().len(), 2);
        assert_eq!(surface.loaded_file(), Some("a.csv"));
    }

    #[test]
    fn test_select_while_dragging_ends_idle() {
        let mut surface = UploadSurface::default();
        surface.drag_enter();
        surface.select_files(vec![csv("picked.csv", "x\n1\n")]);
        assert_eq!(surface.phase(), UploadPhase::Loading);
        surface.wait_idle();
        assert_eq!(surface.phase(), UploadPhase::Idle);
        assert!(!surface.state().is_dragging);
    }

    #[test]
    fn test_empty_drop_is_ignored() {
        let errors = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&errors);
        let mut surface = UploadSurface::default()
            .with_error_callback(move |m| sink.borrow_mut().push(m.to_string()));
        surface.drag_enter();
        surface.drop_files(Vec::new());
        assert_eq!(surface.phase(), UploadPhase::Idle);
        assert!(errors.borrow().is_empty());
    }

    #[test]
    fn test_failure_keeps_rows_and_reports() {
        let errors = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&errors);
        let mut surface = UploadSurface::default()
            .with_error_callback(move |m| sink.borrow_mut().push(m.to_string()));

        surface.select_files(vec![csv("good.csv", "a,b\n1,2\n")]);
        surface.wait_idle();
        assert_eq!(surface.rows().len(), 1);

        surface.select_files(vec![csv("bad.csv", "a,b\n1\n")]);
        surface.wait_idle();
        assert_eq!(surface.phase(), UploadPhase::Idle);
        assert_eq!(surface.rows().len(), 1);
        assert_eq!(surface.loaded_file(), Some("good.csv"));
        assert_eq!(errors.borrow().len(), 1);
        assert!(errors.borrow()[0].contains("Too few fields"));
    }

    #[test]
    fn test_unsupported_file_reported_without_loading() {
        let errors = Rc::new(RefCell::new(Vec::<String>::new()));
        let sink = Rc::clone(&errors);
        let mut surface = UploadSurface::default()
            .with_error_callback(move |m| sink.borrow_mut().push(m.to_string()));
        surface.drop_files(vec![csv("notes.txt", "a\n1\n")]);
        assert_eq!(surface.phase(), UploadPhase::Idle);
        assert_eq!(surface.in_flight(), 0);
        assert!(errors.borrow()[0].contains("notes.txt"));
    }

    #[test]
    fn test_only_first_file_accepted() {
        let mut surface = UploadSurface::default();
        surface.drop_files(vec![csv("one.csv", "n\n1\n"), csv("two.csv", "n\n1\n2\n3\n")]);
        assert_eq!(surface.in_flight(), 1);
        surface.wait_idle();
        assert_eq!(surface.rows().len(), 1);
    }

    #[test]
    fn test_overlapping_uploads_stay_loading_until_all_done() {
        let mut surface = UploadSurface::default();
        surface.select_files(vec![csv("one.csv", "n\n1\n")]);
        surface.select_files(vec![csv("two.csv", "n\n1\n2\n")]);
        assert_eq!(surface.in_flight(), 2);
        surface.wait_idle();
        assert!(!surface.state().is_loading);
        let held = surface.rows().len();
        assert!(held == 1 || held == 2);
    }
}
