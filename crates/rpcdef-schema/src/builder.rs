// crates/rpcdef-schema/src/builder.rs
// ============================================================================
// Module: Schema Builder
// Description: Walks interface and struct declarations into a Definition.
// Purpose: Produce a deterministic, cycle-safe, fully classified schema.
// Dependencies: rpcdef-core, tracing
// ============================================================================

//! ## Overview
//! [`SchemaBuilder::build`] enumerates the top-level interfaces of every
//! package the [`TypeOracle`] reports, turns each into a [`Service`], and
//! constructs an [`Object`] for every named record reachable from the method
//! signatures. Post-traversal passes from [`crate::pipeline`] then prune,
//! sort, and inject response fields.
//!
//! ### Cycle Safety
//! Objects live in a flat pool indexed by declaration name. A name is
//! registered, and its empty object pooled, before any of its fields are
//! read; a second request for the same name is a no-op. A record that
//! references itself therefore terminates after one visit.
//!
//! ### Build State
//! All traversal state lives in a per-call session, so a builder can be
//! reused for repeated builds without interference.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rpcdef_core::CommentExtractor;
use rpcdef_core::Declaration;
use rpcdef_core::Definition;
use rpcdef_core::DefinitionError;
use rpcdef_core::DocIndex;
use rpcdef_core::ExtractedComment;
use rpcdef_core::Field;
use rpcdef_core::FieldDecl;
use rpcdef_core::InterfaceDecl;
use rpcdef_core::JsonDirective;
use rpcdef_core::Method;
use rpcdef_core::MethodDecl;
use rpcdef_core::Object;
use rpcdef_core::PackageRef;
use rpcdef_core::Service;
use rpcdef_core::SourcePosition;
use rpcdef_core::TypeOracle;
use rpcdef_core::TypeRef;
use rpcdef_core::naming::camelize_down;
use rpcdef_core::naming::is_exported;
use rpcdef_core::parse_tags;
use tracing::debug;
use tracing::info;

use crate::error::SchemaError;
use crate::options::BuilderOptions;
use crate::pipeline::ObjectGraph;
use crate::pipeline::inject_output_fields;
use crate::pipeline::prune_excluded;
use crate::pipeline::sort_definition;

mod classify;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Metadata key promoted into [`Field::example`].
pub const EXAMPLE_METADATA_KEY: &str = "example";

// ============================================================================
// SECTION: Schema Builder
// ============================================================================

/// Builds a [`Definition`] from oracle declarations.
///
/// # Invariants
/// - Traversal follows oracle order: sorted scope names, then declared method and field order.
/// - A failed build returns no definition.
///
/// # Examples
/// ```
/// use rpcdef_core::CatalogPackage;
/// use rpcdef_core::DeclarationShape;
/// use rpcdef_core::FieldDecl;
/// use rpcdef_core::InterfaceDecl;
/// use rpcdef_core::MethodDecl;
/// use rpcdef_core::PackageRef;
/// use rpcdef_core::SourceCatalog;
/// use rpcdef_core::SourcePosition;
/// use rpcdef_core::StructDecl;
/// use rpcdef_core::TypeRef;
/// use rpcdef_schema::SchemaBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let app = PackageRef::new("example.com/app", "app");
/// let ping = TypeRef::named(app.clone(), "Ping");
/// let catalog = SourceCatalog::from_packages(vec![
///     CatalogPackage::new(app)
///         .with_declaration(
///             "PingService",
///             DeclarationShape::Interface(InterfaceDecl {
///                 methods: vec![MethodDecl {
///                     name: "Ping".to_string(),
///                     position: SourcePosition::default(),
///                     params: vec![ping.clone()],
///                     results: vec![ping],
///                 }],
///             }),
///         )
///         .with_declaration(
///             "Ping",
///             DeclarationShape::Struct(StructDecl {
///                 fields: vec![FieldDecl {
///                     name: "Seq".to_string(),
///                     ty: TypeRef::builtin("int"),
///                     tag: String::new(),
///                     position: SourcePosition::default(),
///                 }],
///             }),
///         ),
/// ])?;
///
/// let definition = SchemaBuilder::for_source(&catalog).build()?;
/// assert_eq!(definition.services[0].methods[0].name_lower_camel, "ping");
/// assert_eq!(definition.object("Ping")?.fields.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SchemaBuilder<'a> {
    /// Declaration queries.
    oracle: &'a dyn TypeOracle,
    /// Comment queries.
    docs: &'a dyn DocIndex,
    /// Filters and designated types.
    options: BuilderOptions,
}

impl<'a> SchemaBuilder<'a> {
    /// Creates a builder over separate oracle and documentation collaborators.
    #[must_use]
    pub fn new(oracle: &'a dyn TypeOracle, docs: &'a dyn DocIndex) -> Self {
        Self {
            oracle,
            docs,
            options: BuilderOptions::default(),
        }
    }

    /// Creates a builder over a source that answers both kinds of query.
    #[must_use]
    pub fn for_source<S>(source: &'a S) -> Self
    where
        S: TypeOracle + DocIndex,
    {
        Self::new(source, source)
    }

    /// Applies builder options.
    #[must_use]
    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the definition.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] on the first invalid signature, unclassifiable
    /// or nested record, unexported member, malformed field tag, or (in strict
    /// mode) malformed comment metadata.
    pub fn build(&self) -> Result<Definition, SchemaError> {
        let mut session = BuildSession::new(self);
        for package in self.oracle.packages() {
            session.scan_package(package)?;
        }
        let definition = session.finish();
        info!(
            package = %definition.package_name,
            services = definition.services.len(),
            methods = definition.methods().count(),
            objects = definition.objects.len(),
            "schema build complete"
        );
        Ok(definition)
    }
}

// ============================================================================
// SECTION: Build Session
// ============================================================================

/// Mutable traversal state for one build.
struct BuildSession<'a> {
    /// Declaration queries.
    oracle: &'a dyn TypeOracle,
    /// Comment queries.
    docs: &'a dyn DocIndex,
    /// Filters and designated types.
    options: &'a BuilderOptions,
    /// Comment metadata extractor honoring strict mode.
    extractor: CommentExtractor,
    /// Package currently being scanned.
    package: PackageRef,
    /// Retained services.
    services: Vec<Service>,
    /// Object pool in registration order.
    objects: Vec<Object>,
    /// Registered object names to pool slots.
    object_slots: BTreeMap<String, usize>,
    /// Clean names of method response types.
    output_objects: BTreeSet<String>,
    /// Identities of request/response types of excluded services.
    excluded: BTreeSet<String>,
    /// Object references used for pruning.
    graph: ObjectGraph,
    /// External package path to package name.
    imports: BTreeMap<String, String>,
}

impl<'a> BuildSession<'a> {
    /// Starts an empty session.
    fn new(builder: &'a SchemaBuilder<'_>) -> Self {
        Self {
            oracle: builder.oracle,
            docs: builder.docs,
            options: &builder.options,
            extractor: CommentExtractor::new(builder.options.strict_metadata),
            package: PackageRef::new(String::new(), String::new()),
            services: Vec::new(),
            objects: Vec::new(),
            object_slots: BTreeMap::new(),
            output_objects: BTreeSet::new(),
            excluded: BTreeSet::new(),
            graph: ObjectGraph::default(),
            imports: BTreeMap::new(),
        }
    }

    /// Builds services for every interface declared in `package`.
    fn scan_package(&mut self, package: PackageRef) -> Result<(), SchemaError> {
        let oracle = self.oracle;
        debug!(package = %package, "scanning package");
        let names = oracle.scope_names(&package);
        self.package = package;
        for name in names {
            let Some(declaration) = oracle.declaration(&self.package.path, &name) else {
                continue;
            };
            let Some(interface) = declaration.as_interface() else {
                continue;
            };
            if !self.options.includes(&name) {
                debug!(service = %name, "interface not matched; skipping");
                continue;
            }
            let mut roots = BTreeSet::new();
            let service = self.build_service(declaration, interface, &mut roots)?;
            if self.options.excludes(&name) {
                debug!(service = %name, "interface excluded");
                for method in &service.methods {
                    self.excluded.insert(method.input_object.type_id.clone());
                    self.excluded.insert(method.output_object.type_id.clone());
                }
                continue;
            }
            self.graph.roots.extend(roots);
            self.services.push(service);
        }
        Ok(())
    }

    /// Builds one service and collects the objects its methods reference.
    fn build_service(
        &mut self,
        declaration: &'a Declaration,
        interface: &'a InterfaceDecl,
        roots: &mut BTreeSet<String>,
    ) -> Result<Service, SchemaError> {
        debug!(service = %declaration.name, methods = interface.methods.len(), "building service");
        let doc = self.docs.type_doc(&declaration.package.path, &declaration.name);
        let extracted = self.extract(doc, &declaration.position)?;
        let mut methods = Vec::with_capacity(interface.methods.len());
        for method in &interface.methods {
            methods.push(self.build_method(declaration, method, roots)?);
        }
        Ok(Service {
            name: declaration.name.clone(),
            methods,
            comment: extracted.comment,
            metadata: extracted.metadata,
        })
    }

    /// Validates a method signature and classifies its request and response.
    fn build_method(
        &mut self,
        service: &Declaration,
        method: &'a MethodDecl,
        roots: &mut BTreeSet<String>,
    ) -> Result<Method, SchemaError> {
        debug!(service = %service.name, method = %method.name, "building method");
        let doc = self.docs.method_doc(&service.package.path, &service.name, &method.name);
        let extracted = self.extract(doc, &method.position)?;
        let request = self.request_param(method)?;
        let response = self.response_result(method)?;
        ensure_exported_type(request, &method.position)?;
        ensure_exported_type(response, &method.position)?;
        let input_object = self.classify(request, &method.position, roots)?;
        let output_object = self.classify(response, &method.position, roots)?;
        self.output_objects.insert(output_object.clean_object_name.clone());
        Ok(Method {
            name: method.name.clone(),
            name_lower_camel: camelize_down(&method.name),
            input_object,
            output_object,
            comment: extracted.comment,
            metadata: extracted.metadata,
        })
    }

    /// Returns the request-carrying parameter.
    fn request_param(&self, method: &'a MethodDecl) -> Result<&'a TypeRef, SchemaError> {
        let context = &self.options.types.context;
        match method.params.as_slice() {
            [request] => Ok(request),
            [first, request] if first.qualified() == *context => Ok(request),
            [_, _] => Err(invalid_signature(
                method,
                format!("expected first argument of two to be {context}"),
            )),
            _ => Err(invalid_signature(
                method,
                format!("expected arguments (Request) or ({context}, Request)"),
            )),
        }
    }

    /// Returns the response-carrying result.
    fn response_result(&self, method: &'a MethodDecl) -> Result<&'a TypeRef, SchemaError> {
        let error = &self.options.types.error;
        match method.results.as_slice() {
            [response] => Ok(response),
            [response, last] if last.qualified() == *error => Ok(response),
            [_, _] => Err(invalid_signature(
                method,
                format!("expected second return value of two to be {error}"),
            )),
            _ => Err(invalid_signature(
                method,
                format!("expected to return Response or (Response, {error})"),
            )),
        }
    }

    /// Registers and fills the object for a named record declaration.
    ///
    /// Returns the object's type identity. Re-entrant requests for an already
    /// registered name return immediately without reading any fields.
    fn ensure_object(
        &mut self,
        declaration: &'a Declaration,
        fields: &'a [FieldDecl],
    ) -> Result<String, SchemaError> {
        let name = &declaration.name;
        if let Some(slot) = self.object_slots.get(name) {
            return self
                .objects
                .get(*slot)
                .map(|object| object.type_id.clone())
                .ok_or_else(|| DefinitionError::NotFound(name.clone()).into());
        }
        let type_id = format!("{}.{}", declaration.package.path, name);
        let imported = declaration.package.path != self.package.path;
        let slot = self.objects.len();
        self.object_slots.insert(name.clone(), slot);
        self.objects.push(Object {
            type_id: type_id.clone(),
            name: name.clone(),
            imported,
            package: if imported { declaration.package.path.clone() } else { String::new() },
            ..Object::default()
        });
        debug!(object = %name, type_id = %type_id, imported, "building object");

        let doc = self.docs.type_doc(&declaration.package.path, name);
        let extracted = self.extract(doc, &declaration.position)?;
        let mut references = BTreeSet::new();
        let mut built = Vec::with_capacity(fields.len());
        for field in fields {
            if !field.is_exported() {
                continue;
            }
            let field = self.build_field(declaration, field, &mut references)?;
            if field.skip {
                continue;
            }
            built.push(field);
        }

        let object =
            self.objects.get_mut(slot).ok_or_else(|| DefinitionError::NotFound(name.clone()))?;
        object.fields = built;
        object.comment = extracted.comment;
        object.metadata = extracted.metadata;
        self.graph.edges.insert(type_id.clone(), references);
        Ok(type_id)
    }

    /// Builds one field of `owner`.
    fn build_field(
        &mut self,
        owner: &Declaration,
        decl: &'a FieldDecl,
        references: &mut BTreeSet<String>,
    ) -> Result<Field, SchemaError> {
        let parsed_tags = parse_tags(&decl.tag).map_err(|source| SchemaError::TagParse {
            position: decl.position.clone(),
            source,
        })?;
        let directive = JsonDirective::from_tags(&parsed_tags);
        let mut field = Field {
            name: decl.name.clone(),
            name_lower_camel: camelize_down(&decl.name),
            name_json: decl.name.clone(),
            omit_empty: directive.omit_empty,
            tag: decl.tag.clone(),
            parsed_tags,
            skip: directive.skip,
            ..Field::default()
        };
        if let Some(rename) = directive.rename {
            field.name_lower_camel.clone_from(&rename);
            field.name_json = rename;
        }
        if !decl.is_exported() {
            return Err(SchemaError::UnexportedMember {
                position: decl.position.clone(),
                name: format!("{}.{}", owner.name, decl.name),
            });
        }

        let doc = self.docs.field_doc(&owner.package.path, &owner.name, &decl.name);
        let extracted = self.extract(doc, &decl.position)?;
        if let Some(example) = extracted.metadata.get(EXAMPLE_METADATA_KEY) {
            field.example = example.clone();
        }
        field.comment = extracted.comment;
        field.metadata = extracted.metadata;

        if field.skip {
            debug!(object = %owner.name, field = %decl.name, "field skipped by tag");
        } else {
            field.ty = self.classify(&decl.ty, &decl.position, references)?;
        }
        Ok(field)
    }

    /// Splits a comment into metadata and prose, anchoring failures at `position`.
    fn extract(
        &self,
        doc: Option<&str>,
        position: &SourcePosition,
    ) -> Result<ExtractedComment, SchemaError> {
        self.extractor.extract(doc.unwrap_or_default().trim()).map_err(|source| {
            SchemaError::MetadataParse {
                position: position.clone(),
                source,
            }
        })
    }

    /// Applies the pipeline and returns the finished definition.
    fn finish(self) -> Definition {
        let objects = prune_excluded(self.objects, &self.excluded, &self.graph);
        let package_name = self.options.package_name.clone().unwrap_or(self.package.name);
        let mut definition = Definition {
            package_name,
            services: self.services,
            objects,
            imports: self.imports,
        };
        sort_definition(&mut definition);
        inject_output_fields(&mut definition, &self.output_objects);
        definition
    }
}

// ============================================================================
// SECTION: Signature Helpers
// ============================================================================

/// Builds an [`SchemaError::InvalidSignature`] anchored at the method.
fn invalid_signature(method: &MethodDecl, message: String) -> SchemaError {
    SchemaError::InvalidSignature {
        position: method.position.clone(),
        message: format!("{}: {message}", method.name),
    }
}

/// Rejects request/response types whose named base is not exported.
fn ensure_exported_type(ty: &TypeRef, position: &SourcePosition) -> Result<(), SchemaError> {
    let mut base = ty;
    while let Some(inner) = base.sequence_element().or_else(|| base.pointee()) {
        base = inner;
    }
    if let TypeRef::Named {
        package,
        name,
    } = base
        && !is_exported(name)
    {
        return Err(SchemaError::UnexportedMember {
            position: position.clone(),
            name: format!("{}.{name}", package.name),
        });
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
