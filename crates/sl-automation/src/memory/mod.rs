//! In-memory automation backend.
//!
//! Implements [`Application`] and [`ObjectHandle`] over an object graph built from a
//! [`CaseDef`]. It behaves like the external application for everything this workspace
//! relies on: unit conversion, `State` flags, the empty sentinel, collections and
//! sub-objects, `Save` and `Close`. Every remote call is appended to a journal so
//! callers can observe ordering.

mod handle;
mod model;

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use tracing::info;

pub use handle::MemoryHandle;
pub use model::{Call, CallKind, MemoryModel};

use crate::case::{CaseDef, load_case};
use crate::error::{AutomationError, AutomationResult};
use crate::handle::{Application, ObjectHandle};

/// Application over in-memory cases. At most one case is active at a time.
#[derive(Debug, Default)]
pub struct MemoryApplication {
    active: RefCell<Option<Rc<RefCell<MemoryModel>>>>,
    quit: Cell<bool>,
}

impl MemoryApplication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Application with `case` already open, as if the user had opened it by hand.
    pub fn with_active_case(case: &CaseDef) -> AutomationResult<Self> {
        let app = Self::new();
        let model = MemoryModel::from_case(case, None)?;
        *app.active.borrow_mut() = Some(Rc::new(RefCell::new(model)));
        Ok(app)
    }

    /// Current state of the active case.
    pub fn snapshot(&self) -> AutomationResult<CaseDef> {
        Ok(self.active_model()?.borrow().to_case())
    }

    /// Remote calls made against the active case so far.
    pub fn journal(&self) -> AutomationResult<Vec<Call>> {
        Ok(self.active_model()?.borrow().journal().to_vec())
    }

    pub fn clear_journal(&self) -> AutomationResult<()> {
        self.active_model()?.borrow_mut().journal.clear();
        Ok(())
    }

    /// Edit the active case's component list, as a user would in the application.
    pub fn set_components(&self, components: Vec<String>) -> AutomationResult<()> {
        self.active_model()?.borrow_mut().set_components(components);
        Ok(())
    }

    pub fn has_quit(&self) -> bool {
        self.quit.get()
    }

    fn ensure_running(&self) -> AutomationResult<()> {
        if self.quit.get() {
            Err(AutomationError::ApplicationQuit)
        } else {
            Ok(())
        }
    }

    fn active_model(&self) -> AutomationResult<Rc<RefCell<MemoryModel>>> {
        self.active
            .borrow()
            .as_ref()
            .map(Rc::clone)
            .ok_or(AutomationError::NoActiveDocument)
    }

    fn root_handle(model: &Rc<RefCell<MemoryModel>>) -> Box<dyn ObjectHandle> {
        let root = model.borrow().root;
        Box::new(MemoryHandle::new(Rc::clone(model), root))
    }
}

impl Application for MemoryApplication {
    fn open_case(&self, path: &Path) -> AutomationResult<Box<dyn ObjectHandle>> {
        self.ensure_running()?;
        let case = load_case(path)?;
        let model = Rc::new(RefCell::new(MemoryModel::from_case(
            &case,
            Some(path.to_path_buf()),
        )?));
        info!(path = %path.display(), title = %case.title, "opened in-memory case");
        let handle = Self::root_handle(&model);
        *self.active.borrow_mut() = Some(model);
        Ok(handle)
    }

    fn active_document(&self) -> AutomationResult<Box<dyn ObjectHandle>> {
        self.ensure_running()?;
        let model = self.active_model()?;
        if model.borrow().is_closed() {
            return Err(AutomationError::NoActiveDocument);
        }
        Ok(Self::root_handle(&model))
    }

    fn quit(&self) -> AutomationResult<()> {
        self.ensure_running()?;
        self.quit.set(true);
        Ok(())
    }
}
