//! Common test utilities: a scriptable platform and ad-hoc node kinds.
#![allow(dead_code)]

use lantu::error::{NodeError, PlatformError};
use lantu::prelude::*;
use std::result::Result;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A platform whose windows, sessions and input failures are driven by the test.
#[derive(Default)]
pub struct MockPlatform {
    /// `(title, class, handle)` of every window that exists.
    pub windows: RefCell<Vec<(String, String, Handle)>>,
    pub sessions_opened: Cell<usize>,
    pub sessions_closed: RefCell<Vec<Handle>>,
    /// Makes the next `capture_session` call fail once.
    pub fail_next_capture: Cell<bool>,
    /// Error code reported by every input call while set.
    pub input_failure: Cell<Option<u32>>,
    pub input_log: RefCell<Vec<String>>,
}

impl MockPlatform {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn platform(self: &Rc<Self>) -> Platform {
        Platform::new(self.clone(), self.clone(), self.clone())
    }

    pub fn add_window(&self, title: &str, class: &str, raw: u64) -> Handle {
        let handle = Handle::from_raw(raw);
        self.windows
            .borrow_mut()
            .push((title.to_string(), class.to_string(), handle));
        handle
    }

    pub fn close_window(&self, handle: Handle) {
        self.windows.borrow_mut().retain(|(_, _, h)| *h != handle);
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions_opened.get() - self.sessions_closed.borrow().len()
    }

    fn input_call(&self, entry: String) -> Result<(), PlatformError> {
        if let Some(code) = self.input_failure.get() {
            return Err(PlatformError::Os {
                call: "SendInput",
                code,
            });
        }
        self.input_log.borrow_mut().push(entry);
        Ok(())
    }
}

impl WindowProvider for MockPlatform {
    fn find_window(
        &self,
        title: Option<&str>,
        class: Option<&str>,
    ) -> Result<Option<Handle>, PlatformError> {
        Ok(self
            .windows
            .borrow()
            .iter()
            .find(|(t, c, _)| title.is_none_or(|title| t == title) && class.is_none_or(|class| c == class))
            .map(|(_, _, handle)| *handle))
    }

    fn window_rect(&self, window: Handle) -> Result<Rect, PlatformError> {
        if self.is_window(window) {
            Ok(Rect::new(10, 20, 640, 480))
        } else {
            Err(PlatformError::InvalidHandle(window))
        }
    }

    fn is_window(&self, window: Handle) -> bool {
        self.windows.borrow().iter().any(|(_, _, h)| *h == window)
    }
}

impl ScreenCapture for MockPlatform {
    fn capture_screen(&self, region: Rect) -> Result<ImageBuffer, PlatformError> {
        let len = (region.width * region.height) as usize;
        ImageBuffer::new(region.width, region.height, 1, vec![7; len])
            .map_err(|err| PlatformError::Capture(err.to_string()))
    }

    fn open_session(&self, window: Handle) -> Result<Handle, PlatformError> {
        if !self.is_window(window) {
            return Err(PlatformError::InvalidHandle(window));
        }
        self.sessions_opened.set(self.sessions_opened.get() + 1);
        Ok(Handle::from_raw(1000 + self.sessions_opened.get() as u64))
    }

    fn capture_session(&self, _session: Handle) -> Result<ImageBuffer, PlatformError> {
        if self.fail_next_capture.replace(false) {
            return Err(PlatformError::Capture("device lost".to_string()));
        }
        ImageBuffer::new(2, 2, 4, vec![255; 16]).map_err(|err| PlatformError::Capture(err.to_string()))
    }

    fn close_session(&self, session: Handle) {
        self.sessions_closed.borrow_mut().push(session);
    }
}

impl InputInjector for MockPlatform {
    fn mouse_move(&self, to: Point) -> Result<(), PlatformError> {
        self.input_call(format!("move {}", to))
    }

    fn mouse_button(
        &self,
        button: MouseButton,
        action: KeyAction,
        at: Point,
    ) -> Result<(), PlatformError> {
        self.input_call(format!("{:?} {:?} {}", button, action, at))
    }

    fn scroll(&self, delta: i32) -> Result<(), PlatformError> {
        self.input_call(format!("scroll {}", delta))
    }

    fn key(&self, key: &str, action: KeyAction) -> Result<(), PlatformError> {
        self.input_call(format!("key {} {:?}", key, action))
    }

    fn last_error_code(&self) -> u32 {
        self.input_failure.get().unwrap_or(0)
    }
}

/// A one-off node kind whose pins and behavior are chosen by the test.
pub struct TestNode {
    pub kind: &'static str,
    pub inputs: Vec<(&'static str, Value)>,
    pub outputs: Vec<(&'static str, ValueType)>,
    behavior: RefCell<Option<Box<dyn NodeBehavior>>>,
}

impl TestNode {
    pub fn new<F>(kind: &'static str, behavior: F) -> Self
    where
        F: FnMut(&mut ExecuteContext<'_>) -> Result<(), NodeError> + 'static,
    {
        Self {
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
            behavior: RefCell::new(Some(Box::new(behavior))),
        }
    }

    pub fn input(mut self, label: &'static str, default: impl Into<Value>) -> Self {
        self.inputs.push((label, default.into()));
        self
    }

    pub fn output(mut self, label: &'static str, value_type: ValueType) -> Self {
        self.outputs.push((label, value_type));
        self
    }

    pub fn add_to(self, graph: &mut Graph) -> NodeId {
        graph.add_node(&self)
    }
}

impl NodeFactory for TestNode {
    fn kind(&self) -> &str {
        self.kind
    }

    fn spawn(&self, builder: &mut NodeBuilder) -> Box<dyn NodeBehavior> {
        for (label, default) in &self.inputs {
            builder.input(*label, default.clone());
        }
        for (label, value_type) in &self.outputs {
            builder.output(*label, *value_type);
        }
        self.behavior
            .borrow_mut()
            .take()
            .expect("a TestNode spawns exactly one node")
    }
}

/// Shared execution log: node names in the order their behavior ran.
pub type ExecutionLog = Rc<RefCell<Vec<&'static str>>>;

pub fn execution_log() -> ExecutionLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// An Int source emitting `value` and logging each run.
pub fn int_source(graph: &mut Graph, name: &'static str, value: i64, log: &ExecutionLog) -> NodeId {
    let log = log.clone();
    TestNode::new("Test Source", move |ctx: &mut ExecuteContext<'_>| {
        log.borrow_mut().push(name);
        ctx.set_output(0, value);
        Ok(())
    })
    .output("Out", ValueType::Int)
    .add_to(graph)
}

/// Sums its two Int inputs and logs each run.
pub fn adder(graph: &mut Graph, name: &'static str, log: &ExecutionLog) -> NodeId {
    let log = log.clone();
    TestNode::new("Test Add", move |ctx: &mut ExecuteContext<'_>| {
        log.borrow_mut().push(name);
        let sum = ctx.int(0)? + ctx.int(1)?;
        ctx.set_output(0, sum);
        Ok(())
    })
    .input("A", 0i64)
    .input("B", 0i64)
    .output("Sum", ValueType::Int)
    .add_to(graph)
}

/// Passes its Int input through, or fails while `fail` is set.
pub fn gate(
    graph: &mut Graph,
    name: &'static str,
    fail: Rc<Cell<bool>>,
    log: &ExecutionLog,
) -> NodeId {
    let log = log.clone();
    TestNode::new("Test Gate", move |ctx: &mut ExecuteContext<'_>| {
        log.borrow_mut().push(name);
        if fail.get() {
            return Err(NodeError::Custom(format!("{} refused", name)));
        }
        let value = ctx.int(0)?;
        ctx.set_output(0, value);
        Ok(())
    })
    .input("In", 0i64)
    .output("Out", ValueType::Int)
    .add_to(graph)
}

pub fn output(graph: &Graph, node: NodeId, index: usize) -> PinId {
    graph.output_pin(node, index).expect("node has the requested output")
}

pub fn input(graph: &Graph, node: NodeId, index: usize) -> PinId {
    graph.input_pin(node, index).expect("node has the requested input")
}

/// Connects output `from_index` of `from` to input `to_index` of `to`.
pub fn wire(graph: &mut Graph, from: NodeId, from_index: usize, to: NodeId, to_index: usize) {
    let source = output(graph, from, from_index);
    let target = input(graph, to, to_index);
    graph.connect(source, target).expect("pins are compatible");
}
