use crate::ast::Stmt;

/// A named procedure: formal parameters plus a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    name: String,
    parameters: Vec<String>,
    body: Stmt,
}

impl Procedure {
    /// Creates a procedure.
    ///
    /// The body is normally a [`Stmt::Block`], but any statement is accepted.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        parameters: impl IntoIterator<Item = S>,
        body: Stmt,
    ) -> Self {
        Procedure {
            name: name.into(),
            parameters: parameters.into_iter().map(Into::into).collect(),
            body,
        }
    }

    /// Creates a procedure that takes no parameters.
    pub fn nullary(name: impl Into<String>, body: Stmt) -> Self {
        Procedure {
            name: name.into(),
            parameters: Vec::new(),
            body,
        }
    }

    /// Procedure name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Formal parameter names, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Procedure body.
    #[must_use]
    pub fn body(&self) -> &Stmt {
        &self.body
    }
}

/// A parsed source file: an ordered list of procedures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompilationUnit {
    procedures: Vec<Procedure>,
}

impl CompilationUnit {
    /// Creates a unit from procedures in declaration order.
    pub fn new(procedures: impl IntoIterator<Item = Procedure>) -> Self {
        CompilationUnit {
            procedures: procedures.into_iter().collect(),
        }
    }

    /// Appends a procedure.
    pub fn push(&mut self, procedure: Procedure) {
        self.procedures.push(procedure);
    }

    /// Procedures in declaration order.
    #[must_use]
    pub fn procedures(&self) -> &[Procedure] {
        &self.procedures
    }

    /// Looks a procedure up by name.
    #[must_use]
    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name() == name)
    }
}
