//! Type registry: every declared enum type and its constructors.
//!
//! Built in two phases so a constructor field may name a type declared later
//! in the file: phase one collects names, phase two resolves field types.

use crate::diagnostics::error_codes::types;
use crate::diagnostics::{Diagnostic, DiagnosticBag, Note, Span};
use crate::parser::ast::{EnumDecl, Program};
use std::collections::HashMap;

/// Index of a type in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

/// Index of a constructor in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CtorId(usize);

/// A declared enum type
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub span: Span,
    /// Constructors in declaration order
    pub ctors: Vec<CtorId>,
}

/// The type of a constructor's field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Resolved(TypeId),
    /// The named type does not exist. Already reported; consumers treat the
    /// field as matching anything so no follow-up errors appear.
    Poisoned(String),
}

/// A declared constructor
#[derive(Debug, Clone)]
pub struct CtorDef {
    pub name: String,
    pub span: Span,
    /// Set at declaration and never changed
    pub owner: TypeId,
    pub field: Option<FieldType>,
}

impl CtorDef {
    /// Number of arguments the constructor takes (zero or one)
    pub fn arity(&self) -> usize {
        usize::from(self.field.is_some())
    }
}

/// Registry of declared types and constructors
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: Vec<TypeDef>,
    ctors: Vec<CtorDef>,
    types_by_name: HashMap<String, TypeId>,
    /// Constructor names are only unique per type
    ctors_by_name: HashMap<String, Vec<CtorId>>,
}

impl Registry {
    /// Collect all enum declarations of a program
    pub fn build(program: &Program) -> (Registry, DiagnosticBag) {
        let mut registry = Registry::default();
        let mut diagnostics = DiagnosticBag::new();

        // Phase 1: names. Field types are kept as written. Fields of ignored
        // duplicates are still resolved so unknown types get reported.
        let mut pending_fields = Vec::new();
        for decl in program.enums() {
            registry.declare(decl, &mut pending_fields, &mut diagnostics);
        }

        // Phase 2: resolve field types now that every type is known.
        for (ctor, field) in pending_fields {
            let resolved = match registry.types_by_name.get(&field.name) {
                Some(&ty) => FieldType::Resolved(ty),
                None => {
                    diagnostics.push(
                        Diagnostic::error(types::UNKNOWN_TYPE)
                            .message(format!("Unknown type `{}`", field.name))
                            .span(field.span.clone())
                            .build(),
                    );
                    FieldType::Poisoned(field.name.clone())
                }
            };
            if let Some(ctor) = ctor {
                registry.ctors[ctor.0].field = Some(resolved);
            }
        }

        diagnostics.sort_by_position();
        tracing::debug!(
            types = registry.types.len(),
            ctors = registry.ctors.len(),
            errors = diagnostics.len(),
            "built type registry"
        );
        (registry, diagnostics)
    }

    fn declare<'p>(
        &mut self,
        decl: &'p EnumDecl,
        pending_fields: &mut Vec<(Option<CtorId>, &'p crate::parser::ast::Ident)>,
        diagnostics: &mut DiagnosticBag,
    ) {
        if let Some(&existing) = self.types_by_name.get(&decl.name.name) {
            diagnostics.push(
                Diagnostic::error(types::DUPLICATE_TYPE)
                    .message(format!("Type `{}` is declared more than once", decl.name.name))
                    .span(decl.name.span.clone())
                    .note(
                        Note::new("first declared here")
                            .with_span(self.type_def(existing).span.clone()),
                    )
                    .build(),
            );
            pending_fields.extend(
                decl.ctors
                    .iter()
                    .filter_map(|c| c.field.as_ref())
                    .map(|field| (None, field)),
            );
            return;
        }

        let ty = TypeId(self.types.len());
        self.types.push(TypeDef {
            name: decl.name.name.clone(),
            span: decl.name.span.clone(),
            ctors: Vec::new(),
        });
        self.types_by_name.insert(decl.name.name.clone(), ty);

        for ctor_decl in &decl.ctors {
            let duplicate = self.types[ty.0]
                .ctors
                .iter()
                .map(|&id| &self.ctors[id.0])
                .find(|c| c.name == ctor_decl.name.name);
            if let Some(first) = duplicate {
                diagnostics.push(
                    Diagnostic::error(types::DUPLICATE_CONSTRUCTOR)
                        .message(format!(
                            "Constructor `{}` is declared more than once in `{}`",
                            ctor_decl.name.name, decl.name.name
                        ))
                        .span(ctor_decl.name.span.clone())
                        .note(Note::new("first declared here").with_span(first.span.clone()))
                        .build(),
                );
                if let Some(field) = &ctor_decl.field {
                    pending_fields.push((None, field));
                }
                continue;
            }

            let id = CtorId(self.ctors.len());
            self.ctors.push(CtorDef {
                name: ctor_decl.name.name.clone(),
                span: ctor_decl.name.span.clone(),
                owner: ty,
                field: None,
            });
            self.types[ty.0].ctors.push(id);
            self.ctors_by_name
                .entry(ctor_decl.name.name.clone())
                .or_default()
                .push(id);

            if let Some(field) = &ctor_decl.field {
                pending_fields.push((Some(id), field));
            }
        }
    }

    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0]
    }

    pub fn ctor(&self, id: CtorId) -> &CtorDef {
        &self.ctors[id.0]
    }

    pub fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.types_by_name.get(name).copied()
    }

    /// Every constructor with this name, in declaration order
    pub fn ctors_named(&self, name: &str) -> &[CtorId] {
        self.ctors_by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The constructor of `ty` with this name
    pub fn ctor_of(&self, ty: TypeId, name: &str) -> Option<CtorId> {
        self.type_def(ty)
            .ctors
            .iter()
            .copied()
            .find(|&id| self.ctor(id).name == name)
    }

    /// Name of the type owning a constructor
    pub fn owner_name(&self, ctor: CtorId) -> &str {
        &self.type_def(self.ctor(ctor).owner).name
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
