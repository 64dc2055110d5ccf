//! Run-time memory: a stack of frames, each a stack of scopes.
//!
//! A scope maps names to slots; a frame is a nonempty stack of scopes
//! with a name (the called function's). Frame 0 is the global frame:
//! it holds global variables plus every function and built-in binding,
//! and lives for the whole run.
//!
//! Lookup searches the current frame's scopes inner to outer and then
//! falls through to the global frame only - locals of a suspended
//! caller are never visible to its callee. Writes go to the innermost
//! scope that declares the name.

use cwalk_par::NodeId;
use cwalk_util::{CwalkError, Result};
use indexmap::IndexMap;

use crate::builtins::NativeFn;
use crate::number::Number;

/// What a name in a scope is bound to.
#[derive(Clone, Debug)]
pub enum Slot {
    /// Declared storage with no value yet; reading it is an error.
    Uninit,

    /// Storage holding a value.
    Cell(Number),

    /// A user function, by its declaration node.
    Func(NodeId),

    /// A native callable bound by an include.
    Native(NativeFn),
}

/// A callable resolved from memory.
#[derive(Clone, Copy, Debug)]
pub enum Callable {
    Function(NodeId),
    Native(NativeFn),
}

type Scope = IndexMap<String, Slot>;

/// A per-call activation record: a named, nonempty stack of scopes.
struct Frame {
    name: String,
    scopes: Vec<Scope>,
}

impl Frame {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scopes: vec![Scope::new()],
        }
    }
}

/// The interpreter's memory: a stack of frames.
pub struct Memory {
    frames: Vec<Frame>,
}

impl Memory {
    /// Creates memory holding only the global frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new("global")],
        }
    }

    /// Pushes a frame for a call to `name`.
    pub fn new_frame(&mut self, name: &str) {
        self.frames.push(Frame::new(name));
    }

    /// Pops the current frame. The global frame stays.
    pub fn del_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "cannot pop the global frame");
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Pushes a scope onto the current frame.
    pub fn new_scope(&mut self) {
        self.current_frame_mut().scopes.push(Scope::new());
    }

    /// Pops the current frame's innermost scope. Its base scope stays.
    pub fn del_scope(&mut self) {
        let frame = self.current_frame_mut();
        debug_assert!(frame.scopes.len() > 1, "cannot pop a frame's base scope");
        if frame.scopes.len() > 1 {
            frame.scopes.pop();
        }
    }

    /// Declares `name` in the current scope as uninitialized storage.
    ///
    /// Redeclaration in the same scope resets the cell; the analyzer
    /// rejects that before evaluation starts.
    pub fn declare(&mut self, name: &str) {
        self.current_scope_mut().insert(name.to_string(), Slot::Uninit);
    }

    /// Binds `name` in the current scope directly to `slot`. Used for
    /// function and built-in bindings in the global frame.
    pub fn bind(&mut self, name: &str, slot: Slot) {
        self.current_scope_mut().insert(name.to_string(), slot);
    }

    /// Reads the value of `name`.
    pub fn get(&self, name: &str, line: u32) -> Result<Number> {
        match self.find(name) {
            Some(Slot::Cell(value)) => Ok(*value),
            Some(Slot::Uninit) => Err(CwalkError::runtime(
                format!("use of uninitialized variable '{}'", name),
                line,
            )),
            Some(_) => Err(CwalkError::runtime(
                format!("'{}' is not a variable", name),
                line,
            )),
            None => Err(CwalkError::runtime(
                format!("undeclared variable '{}'", name),
                line,
            )),
        }
    }

    /// Writes `value` into the innermost declaring scope of `name`.
    pub fn set(&mut self, name: &str, value: Number, line: u32) -> Result<()> {
        match self.find_mut(name) {
            Some(slot @ (Slot::Uninit | Slot::Cell(_))) => {
                *slot = Slot::Cell(value);
                Ok(())
            }
            Some(_) => Err(CwalkError::runtime(
                format!("cannot assign to '{}': not a variable", name),
                line,
            )),
            None => Err(CwalkError::runtime(
                format!("assignment to undeclared variable '{}'", name),
                line,
            )),
        }
    }

    /// Resolves `name` to a callable.
    pub fn lookup_callable(&self, name: &str, line: u32) -> Result<Callable> {
        match self.find(name) {
            Some(Slot::Func(id)) => Ok(Callable::Function(*id)),
            Some(Slot::Native(f)) => Ok(Callable::Native(*f)),
            Some(_) => Err(CwalkError::runtime(
                format!("'{}' is not a function", name),
                line,
            )),
            None => Err(CwalkError::runtime(
                format!("call to undefined function '{}'", name),
                line,
            )),
        }
    }

    /// Name of the current frame (the executing function).
    pub fn frame_name(&self) -> &str {
        &self.frames.last().expect("frame stack is never empty").name
    }

    /// Number of live frames, global included.
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Number of live scopes in the current frame.
    pub fn scope_depth(&self) -> usize {
        self.frames
            .last()
            .expect("frame stack is never empty")
            .scopes
            .len()
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("frame stack is never empty")
    }

    fn current_scope_mut(&mut self) -> &mut Scope {
        self.current_frame_mut()
            .scopes
            .last_mut()
            .expect("scope stack is never empty")
    }

    /// Lookup rule: current frame inner to outer, then the global
    /// frame only.
    fn find(&self, name: &str) -> Option<&Slot> {
        let current = self.frames.last().expect("frame stack is never empty");
        for scope in current.scopes.iter().rev() {
            if let Some(slot) = scope.get(name) {
                return Some(slot);
            }
        }

        if self.frames.len() > 1 {
            for scope in self.frames[0].scopes.iter().rev() {
                if let Some(slot) = scope.get(name) {
                    return Some(slot);
                }
            }
        }

        None
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Slot> {
        let current = self.frames.len() - 1;

        if let Some(idx) = self.frames[current]
            .scopes
            .iter()
            .rposition(|scope| scope.contains_key(name))
        {
            return self.frames[current].scopes[idx].get_mut(name);
        }

        if current > 0 {
            if let Some(idx) = self.frames[0]
                .scopes
                .iter()
                .rposition(|scope| scope.contains_key(name))
            {
                return self.frames[0].scopes[idx].get_mut(name);
            }
        }

        None
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const L: u32 = 1;

    #[test]
    fn test_declare_then_read_is_an_error() {
        let mut memory = Memory::new();
        memory.declare("x");
        let err = memory.get("x", L).unwrap_err();
        assert_eq!(err.kind(), "RuntimeError");
    }

    #[test]
    fn test_declare_set_get() {
        let mut memory = Memory::new();
        memory.declare("x");
        memory.set("x", Number::Int(42), L).unwrap();
        assert_eq!(memory.get("x", L).unwrap(), Number::Int(42));
    }

    #[test]
    fn test_undeclared_reads_and_writes_fail() {
        let mut memory = Memory::new();
        assert_eq!(memory.get("x", L).unwrap_err().kind(), "RuntimeError");
        assert_eq!(
            memory.set("x", Number::Int(1), L).unwrap_err().kind(),
            "RuntimeError"
        );
    }

    #[test]
    fn test_writes_hit_the_declaring_scope() {
        let mut memory = Memory::new();
        memory.declare("x");
        memory.set("x", Number::Int(1), L).unwrap();

        memory.new_scope();
        // No shadowing declaration: the write lands on the outer cell.
        memory.set("x", Number::Int(2), L).unwrap();
        memory.del_scope();

        assert_eq!(memory.get("x", L).unwrap(), Number::Int(2));
    }

    #[test]
    fn test_shadowing_scope_keeps_outer_value() {
        let mut memory = Memory::new();
        memory.declare("x");
        memory.set("x", Number::Int(1), L).unwrap();

        memory.new_scope();
        memory.declare("x");
        memory.set("x", Number::Int(99), L).unwrap();
        assert_eq!(memory.get("x", L).unwrap(), Number::Int(99));
        memory.del_scope();

        assert_eq!(memory.get("x", L).unwrap(), Number::Int(1));
    }

    #[test]
    fn test_caller_locals_are_invisible_to_callee() {
        let mut memory = Memory::new();
        memory.new_frame("caller");
        memory.declare("local");
        memory.set("local", Number::Int(7), L).unwrap();

        memory.new_frame("callee");
        // Lookup skips the caller's frame entirely.
        assert_eq!(memory.get("local", L).unwrap_err().kind(), "RuntimeError");

        memory.del_frame();
        assert_eq!(memory.get("local", L).unwrap(), Number::Int(7));
        memory.del_frame();
    }

    #[test]
    fn test_globals_visible_from_any_frame() {
        let mut memory = Memory::new();
        memory.declare("g");
        memory.set("g", Number::Int(5), L).unwrap();

        memory.new_frame("f");
        memory.new_frame("deeper");
        assert_eq!(memory.get("g", L).unwrap(), Number::Int(5));
        memory.set("g", Number::Int(6), L).unwrap();
        memory.del_frame();
        memory.del_frame();

        assert_eq!(memory.get("g", L).unwrap(), Number::Int(6));
    }

    #[test]
    fn test_frame_and_scope_depths() {
        let mut memory = Memory::new();
        assert_eq!(memory.frame_depth(), 1);
        assert_eq!(memory.scope_depth(), 1);

        memory.new_frame("f");
        memory.new_scope();
        assert_eq!(memory.frame_depth(), 2);
        assert_eq!(memory.scope_depth(), 2);

        memory.del_scope();
        memory.del_frame();
        assert_eq!(memory.frame_depth(), 1);
        assert_eq!(memory.scope_depth(), 1);
    }

    #[test]
    fn test_function_binding_is_not_a_value() {
        use cwalk_util::Idx;

        let mut memory = Memory::new();
        memory.bind("f", Slot::Func(cwalk_par::NodeId::from_usize(0)));
        assert_eq!(memory.get("f", L).unwrap_err().kind(), "RuntimeError");
        assert!(matches!(
            memory.lookup_callable("f", L).unwrap(),
            Callable::Function(_)
        ));
    }

    #[test]
    fn test_calling_a_variable_fails() {
        let mut memory = Memory::new();
        memory.declare("x");
        memory.set("x", Number::Int(1), L).unwrap();
        assert_eq!(
            memory.lookup_callable("x", L).unwrap_err().kind(),
            "RuntimeError"
        );
    }
}
