use serde::{Deserialize, Serialize};
use std::fmt;

/// An attribute on a method that the trimming analyses interpret.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Annotation {
    /// Calling this method is only safe when `capability` is available at
    /// runtime, e.g. `"UnreferencedCode"` or `"DynamicCode"`.
    Requires { capability: String, message: String },
    /// This method resolves a member by name, reading the name from the
    /// argument at position `argument`.
    ReflectionAccess { argument: usize },
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Annotation::Requires {
                capability,
                message,
            } => write!(f, "[Requires{}({:?})]", capability, message),
            Annotation::ReflectionAccess { argument } => {
                write!(f, "[ReflectionAccess(arg{})]", argument)
            }
        }
    }
}

/// A reference to a method, as seen from a call site.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct MethodRef {
    name: String,
    annotations: Vec<Annotation>,
}

impl MethodRef {
    pub fn new<S: Into<String>>(name: S) -> MethodRef {
        MethodRef {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    /// Add an `Annotation` to this `MethodRef`.
    pub fn with_annotation(mut self, annotation: Annotation) -> MethodRef {
        self.annotations.push(annotation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Every `(capability, message)` this method requires.
    pub fn requirements(&self) -> impl Iterator<Item = (&str, &str)> {
        requirements(&self.annotations)
    }

    /// If this method resolves members reflectively, the position of the
    /// argument holding the member name.
    pub fn reflection_argument(&self) -> Option<usize> {
        self.annotations.iter().find_map(|annotation| match annotation {
            Annotation::ReflectionAccess { argument } => Some(*argument),
            Annotation::Requires { .. } => None,
        })
    }
}

pub(crate) fn requirements(annotations: &[Annotation]) -> impl Iterator<Item = (&str, &str)> {
    annotations.iter().filter_map(|annotation| match annotation {
        Annotation::Requires {
            capability,
            message,
        } => Some((capability.as_str(), message.as_str())),
        Annotation::ReflectionAccess { .. } => None,
    })
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
