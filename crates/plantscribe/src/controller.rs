//! Selection controller
//!
//! A four-state machine driving which parts of the current index are read:
//! `Idle → AssemblyFocused → ClassFocused → Rendered`. Every transition is a
//! plain method call; display surfaces follow along through notification
//! channels obtained from [`SelectionController::subscribe`].

use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use tracing::{debug, info, span, warn, Level};

use crate::core::{CodebaseProvider, DiagramConfig, ScribeError};
use crate::diagram::DiagramPipeline;
use crate::index::{Session, SolutionIndex};

/// Where the controller currently is
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    AssemblyFocused {
        assembly: String,
    },
    ClassFocused {
        assembly: String,
        class: String,
    },
    Rendered {
        assembly: String,
        class: String,
        diagram: String,
    },
}

impl SelectionState {
    /// The focused assembly, if any
    pub fn assembly(&self) -> Option<&str> {
        match self {
            SelectionState::Idle => None,
            SelectionState::AssemblyFocused { assembly }
            | SelectionState::ClassFocused { assembly, .. }
            | SelectionState::Rendered { assembly, .. } => Some(assembly),
        }
    }

    /// The rendered diagram, if the controller is in `Rendered`
    pub fn diagram(&self) -> Option<&str> {
        match self {
            SelectionState::Rendered { diagram, .. } => Some(diagram),
            _ => None,
        }
    }
}

/// Events the controller reacts to
#[derive(Debug, Clone)]
pub enum SelectionEvent {
    LoadCompleted(Arc<SolutionIndex>),
    SelectAssembly(String),
    SelectClass(String),
}

/// Updates published to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    AssembliesListed(Vec<String>),
    ClassesListed(Vec<String>),
    DiagramCleared,
    DiagramRendered(String),
}

/// Receives every successfully rendered diagram
pub trait ClipboardSink: Send {
    fn publish(&mut self, text: &str) -> Result<()>;
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClipboard;

impl ClipboardSink for NullClipboard {
    fn publish(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Keeps every published text; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    entries: Arc<Mutex<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.entries().pop()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn publish(&mut self, text: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}

/// Cascading assembly/class selection over the current index
pub struct SelectionController {
    index: Option<Arc<SolutionIndex>>,
    state: SelectionState,
    pipeline: DiagramPipeline,
    clipboard: Box<dyn ClipboardSink>,
    subscribers: Vec<Sender<Notification>>,
}

impl SelectionController {
    pub fn new(config: &DiagramConfig) -> Self {
        Self {
            index: None,
            state: SelectionState::Idle,
            pipeline: DiagramPipeline::from_config(config),
            clipboard: Box::new(NullClipboard),
            subscribers: Vec::new(),
        }
    }

    pub fn with_clipboard(mut self, clipboard: impl ClipboardSink + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    /// Open a new notification channel
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn index(&self) -> Option<&Arc<SolutionIndex>> {
        self.index.as_ref()
    }

    /// Apply one event; returns the diagram text when a class was rendered
    pub fn handle(&mut self, event: SelectionEvent) -> Option<String> {
        match event {
            SelectionEvent::LoadCompleted(index) => {
                self.load_completed(index);
                None
            }
            SelectionEvent::SelectAssembly(name) => {
                self.select_assembly(&name);
                None
            }
            SelectionEvent::SelectClass(name) => self.select_class(&name),
        }
    }

    /// Load through `session` and, on success, install the new index
    pub fn request_load(
        &mut self,
        session: &Session,
        provider: &dyn CodebaseProvider,
    ) -> Result<(), ScribeError> {
        let index = session.load(provider)?;
        self.load_completed(index);
        Ok(())
    }

    /// Install `index`, reset to `Idle` and publish its assembly names
    pub fn load_completed(&mut self, index: Arc<SolutionIndex>) {
        let had_diagram = self.state.diagram().is_some();
        let names = index.assembly_names();
        info!(assembly_count = names.len(), "Index loaded, selection reset");

        self.index = Some(index);
        self.state = SelectionState::Idle;
        self.notify(Notification::AssembliesListed(names));
        if had_diagram {
            self.notify(Notification::DiagramCleared);
        }
    }

    /// Focus `name`; returns whether the selection was applied
    pub fn select_assembly(&mut self, name: &str) -> bool {
        let Some(classes) = self.index.as_ref().and_then(|index| index.class_names(name)) else {
            debug!(assembly = name, "Assembly not in index, ignoring selection");
            return false;
        };

        let had_diagram = self.state.diagram().is_some();
        debug!(assembly = name, class_count = classes.len(), "Assembly focused");
        self.state = SelectionState::AssemblyFocused {
            assembly: name.to_string(),
        };
        self.notify(Notification::ClassesListed(classes));
        if had_diagram {
            self.notify(Notification::DiagramCleared);
        }
        true
    }

    /// Select `name` in the focused assembly and render it
    ///
    /// Unknown names, a missing assembly focus and a failed render leave the
    /// state untouched.
    pub fn select_class(&mut self, name: &str) -> Option<String> {
        let select_span = span!(Level::INFO, "select_class", class = name);
        let _enter = select_span.enter();

        let index = Arc::clone(self.index.as_ref()?);
        let Some(assembly) = self.state.assembly().map(str::to_string) else {
            debug!("No assembly focused, ignoring class selection");
            return None;
        };
        let Some(record) = index.find_type(&assembly, name) else {
            debug!(assembly = assembly.as_str(), "Class not in assembly, ignoring selection");
            return None;
        };

        let class = record.qualified_name.clone();
        let previous = std::mem::replace(
            &mut self.state,
            SelectionState::ClassFocused {
                assembly: assembly.clone(),
                class: class.clone(),
            },
        );

        let rendered = self.pipeline.render_type(&index, &assembly, record);
        self.complete_selection(previous, assembly, class, rendered)
    }

    /// Leave `ClassFocused`: into `Rendered` on success, back to `previous` on failure
    fn complete_selection(
        &mut self,
        previous: SelectionState,
        assembly: String,
        class: String,
        rendered: Result<String, ScribeError>,
    ) -> Option<String> {
        let diagram = match rendered {
            Ok(diagram) => diagram,
            Err(e) => {
                warn!(
                    error = %e,
                    class = class.as_str(),
                    "Rendering failed, keeping previous selection"
                );
                self.state = previous;
                return None;
            }
        };

        if let Err(e) = self.clipboard.publish(&diagram) {
            warn!(error = %e, "Clipboard publish failed");
        }
        self.state = SelectionState::Rendered {
            assembly,
            class,
            diagram: diagram.clone(),
        };
        self.notify(Notification::DiagramRendered(diagram.clone()));
        Some(diagram)
    }

    fn notify(&mut self, notification: Notification) {
        self.subscribers
            .retain(|tx| tx.send(notification.clone()).is_ok());
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(&DiagramConfig::default())
    }
}

impl fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("state", &self.state)
            .field("loaded", &self.index.is_some())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        DocumentSource, MemberDeclaration, ProjectSource, SemanticModel, SyntaxRoot, SyntaxTree,
        TypeDeclaration, TypeSymbol,
    };

    struct Model;

    impl SemanticModel for Model {
        fn type_symbol(&self, qualified_name: &str) -> Option<TypeSymbol> {
            (qualified_name == "Dog").then(|| TypeSymbol::new("Dog").with_base("Animal"))
        }
    }

    struct Document(SyntaxTree);

    impl DocumentSource for Document {
        fn name(&self) -> &str {
            &self.0.path
        }

        fn semantic_model(&self) -> Option<Arc<dyn SemanticModel>> {
            Some(Arc::new(Model))
        }

        fn syntax_tree(&self) -> Option<&SyntaxTree> {
            Some(&self.0)
        }
    }

    struct Project(&'static str, Vec<Document>);

    impl ProjectSource for Project {
        fn name(&self) -> &str {
            self.0
        }

        fn documents(&self) -> Vec<&dyn DocumentSource> {
            self.1.iter().map(|d| d as &dyn DocumentSource).collect()
        }
    }

    struct Codebase(Vec<Project>);

    impl CodebaseProvider for Codebase {
        fn projects(&self) -> Result<Vec<&dyn ProjectSource>, ScribeError> {
            Ok(self.0.iter().map(|p| p as &dyn ProjectSource).collect())
        }
    }

    fn codebase() -> Codebase {
        let dog = TypeDeclaration::class("Dog")
            .with_base("Animal")
            .with_member(MemberDeclaration::method("Bark", "void").with_modifiers(["public"]));
        let cat = TypeDeclaration::class("Cat").with_member(MemberDeclaration::field("int", "lives"));
        Codebase(vec![
            Project(
                "Zoo",
                vec![Document(SyntaxTree::new("Zoo.cs", SyntaxRoot::new(vec![dog, cat])))],
            ),
            Project("Farm", Vec::new()),
        ])
    }

    fn loaded() -> (SelectionController, MemoryClipboard, Receiver<Notification>) {
        let clipboard = MemoryClipboard::new();
        let mut controller = SelectionController::default().with_clipboard(clipboard.clone());
        let rx = controller.subscribe();
        controller
            .request_load(&Session::new(), &codebase())
            .unwrap();
        (controller, clipboard, rx)
    }

    #[test]
    fn test_load_publishes_assemblies() {
        let (controller, _, rx) = loaded();
        assert_eq!(controller.state(), &SelectionState::Idle);
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::AssembliesListed(vec!["Farm".to_string(), "Zoo".to_string()])
        );
    }

    #[test]
    fn test_full_cascade() {
        let (mut controller, clipboard, rx) = loaded();
        rx.try_recv().unwrap();

        assert!(controller.select_assembly("Zoo"));
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::ClassesListed(vec!["Cat".to_string(), "Dog".to_string()])
        );

        let diagram = controller.handle(SelectionEvent::SelectClass("Dog".to_string())).unwrap();
        assert!(diagram.contains("Dog --|> Animal\n"));
        assert_eq!(rx.try_recv().unwrap(), Notification::DiagramRendered(diagram.clone()));
        assert_eq!(clipboard.entries(), vec![diagram.clone()]);
        assert_eq!(controller.state().diagram(), Some(diagram.as_str()));
    }

    #[test]
    fn test_unknown_class_is_noop() {
        let (mut controller, clipboard, rx) = loaded();
        controller.select_assembly("Zoo");
        controller.select_class("Dog");
        let before = controller.state().clone();
        while rx.try_recv().is_ok() {}

        assert!(controller.select_class("Ghost").is_none());
        assert_eq!(controller.state(), &before);
        assert_eq!(clipboard.entries().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unknown_assembly_is_noop() {
        let (mut controller, _, rx) = loaded();
        rx.try_recv().unwrap();
        assert!(!controller.select_assembly("Aquarium"));
        assert_eq!(controller.state(), &SelectionState::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_class_without_focus_is_noop() {
        let (mut controller, clipboard, _) = loaded();
        assert!(controller.select_class("Dog").is_none());
        assert_eq!(controller.state(), &SelectionState::Idle);
        assert!(clipboard.entries().is_empty());
    }

    #[test]
    fn test_nothing_loaded() {
        let mut controller = SelectionController::default();
        assert!(!controller.select_assembly("Zoo"));
        assert!(controller.select_class("Dog").is_none());
        assert!(controller.index().is_none());
    }

    #[test]
    fn test_reselecting_assembly_clears_diagram() {
        let (mut controller, _, rx) = loaded();
        controller.select_assembly("Zoo");
        controller.select_class("Cat");
        while rx.try_recv().is_ok() {}

        controller.select_assembly("Farm");
        assert_eq!(rx.try_recv().unwrap(), Notification::ClassesListed(Vec::new()));
        assert_eq!(rx.try_recv().unwrap(), Notification::DiagramCleared);
        assert_eq!(
            controller.state(),
            &SelectionState::AssemblyFocused {
                assembly: "Farm".to_string()
            }
        );
    }

    #[test]
    fn test_reload_resets_to_idle() {
        let (mut controller, _, _) = loaded();
        controller.select_assembly("Zoo");
        controller.select_class("Dog");

        let index = controller.index().cloned().unwrap();
        controller.handle(SelectionEvent::LoadCompleted(index));
        assert_eq!(controller.state(), &SelectionState::Idle);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut controller = SelectionController::default();
        drop(controller.subscribe());
        let rx = controller.subscribe();
        controller.load_completed(Arc::new(SolutionIndex::default()));
        assert_eq!(rx.try_recv().unwrap(), Notification::AssembliesListed(Vec::new()));
        assert!(format!("{:?}", controller).contains("subscribers: 1"));
    }

    #[test]
    fn test_failed_render_keeps_previous_selection() {
        let (mut controller, clipboard, rx) = loaded();
        controller.select_assembly("Zoo");
        controller.select_class("Dog");
        let before = controller.state().clone();
        while rx.try_recv().is_ok() {}

        controller.state = SelectionState::ClassFocused {
            assembly: "Zoo".to_string(),
            class: "Cat".to_string(),
        };
        let result = controller.complete_selection(
            before.clone(),
            "Zoo".to_string(),
            "Cat".to_string(),
            Err(ScribeError::render_error("writer closed")),
        );

        assert!(result.is_none());
        assert_eq!(controller.state(), &before);
        assert!(controller.state().diagram().unwrap().contains("class Dog {"));
        assert_eq!(clipboard.entries().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    struct FailingClipboard;

    impl ClipboardSink for FailingClipboard {
        fn publish(&mut self, _text: &str) -> Result<()> {
            anyhow::bail!("clipboard unavailable")
        }
    }

    #[test]
    fn test_clipboard_failure_still_renders() {
        let mut controller = SelectionController::default().with_clipboard(FailingClipboard);
        controller.request_load(&Session::new(), &codebase()).unwrap();
        controller.select_assembly("Zoo");
        assert!(controller.select_class("Dog").is_some());
        assert!(controller.state().diagram().is_some());
    }
}
