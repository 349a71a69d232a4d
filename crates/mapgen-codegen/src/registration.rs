//! Registration directives and the aggregated registration module.

use indexmap::IndexMap;

use crate::catalog::TypeCatalog;
use crate::config::GeneratorConfig;
use crate::converter::{side_type, GeneratedUnit, UnitKind};
use crate::error::GenerationError;
use crate::naming::Imports;
use crate::resolver::ArgReader;
use crate::types::{
    Directive, Lifecycle, MapperRef, MapperSpec, Qualifier, RegistrationSpec, RegistrationStyle,
    TypeInfo,
};

/// Name of the aggregated registration unit.
pub const MODULE_UNIT_NAME: &str = "MappersModule";
/// Function the registration unit exports.
pub const MODULE_FN_NAME: &str = "mappers_module";

/// A collected registration plus the non-fatal findings made along the way.
#[derive(Debug)]
pub struct CollectedRegistration {
    pub spec: RegistrationSpec,
    pub warnings: Vec<GenerationError>,
}

/// Read a `register` directive of `info`.
///
/// `mapping` is the spec resolved from the same type's `map_to` directive, or
/// `None` when there is none or it failed to resolve; either way that is a
/// [`GenerationError::RegistrationWithoutMapping`].
pub fn collect_registration(
    info: &TypeInfo,
    directive: &Directive,
    mapping: Option<&MapperSpec>,
    catalog: &TypeCatalog,
    config: &GeneratorConfig,
) -> Result<CollectedRegistration, GenerationError> {
    let type_name = info.qualified_name.as_str();
    let mapping = mapping.ok_or_else(|| GenerationError::RegistrationWithoutMapping {
        type_name: type_name.to_string(),
    })?;

    let args = ArgReader::new(type_name, directive);
    let lifecycle = if args.bool_or("singleton", true)? {
        Lifecycle::Singleton
    } else {
        Lifecycle::Factory
    };
    let eager_start = args.bool_or("created_at_start", false)?;

    let qualifier = match (args.string("named")?, args.type_ref("named_type")?) {
        (Some(name), _) => Some(Qualifier::Named(name.to_string())),
        (None, Some(reference)) => Some(Qualifier::Type(
            catalog
                .resolve(reference)
                .map(|info| info.qualified_name.clone())
                .unwrap_or_else(|_| reference.to_string()),
        )),
        (None, None) => None,
    };

    let style = if args.bool_or("constructor_style", true)? {
        RegistrationStyle::Constructor
    } else {
        RegistrationStyle::Lambda
    };

    let mut warnings = Vec::new();
    if eager_start && lifecycle == Lifecycle::Factory {
        let finding = GenerationError::EagerStartWithoutSingleton {
            type_name: type_name.to_string(),
        };
        if config.strict {
            return Err(finding);
        }
        warnings.push(finding);
    }

    Ok(CollectedRegistration {
        spec: RegistrationSpec {
            mapper: MapperRef::from(mapping),
            lifecycle,
            eager_start,
            qualifier,
            bind_interfaces: args.bool_or("bind_interfaces", false)?,
            style,
        },
        warnings,
    })
}

/// Registration entries of one pass, keyed by owning type in discovery order.
#[derive(Debug, Default)]
pub struct RegistrationAccumulator {
    entries: IndexMap<String, RegistrationSpec>,
}

impl RegistrationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the entry for `type_name`. Returns `false`, keeping the first
    /// entry, when the type was already recorded.
    pub fn record(&mut self, type_name: &str, spec: RegistrationSpec) -> bool {
        if self.entries.contains_key(type_name) {
            return false;
        }
        self.entries.insert(type_name.to_string(), spec);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Vec<RegistrationSpec> {
        self.entries.into_values().collect()
    }
}

/// Render the registration module, or `None` when there is nothing to register.
pub fn synthesize_module(
    registrations: &[RegistrationSpec],
    config: &GeneratorConfig,
) -> Option<GeneratedUnit> {
    if registrations.is_empty() {
        return None;
    }

    let runtime = config.runtime_path.as_str();
    let mut imports = Imports::new();
    let module = imports.reference(&format!("{runtime}::di::Module"));

    let mut statements = Vec::with_capacity(registrations.len());
    for registration in registrations {
        statements.push(render_statement(registration, &mut imports, config));
    }

    let mut output = imports.render();
    if !imports.is_empty() {
        output.push('\n');
    }
    output.push_str("/// Registration declarations for every generated mapper.\n");
    output.push_str(&format!("pub fn {MODULE_FN_NAME}() -> {module} {{\n"));
    output.push_str(&format!("    let mut module = {module}::new();\n"));
    for statement in statements {
        output.push_str(&statement);
    }
    output.push_str("    module\n");
    output.push_str("}\n");

    tracing::debug!(entries = registrations.len(), "synthesized registration module");
    Some(GeneratedUnit {
        name: MODULE_UNIT_NAME.to_string(),
        item: MODULE_FN_NAME.to_string(),
        kind: UnitKind::RegistrationModule,
        owner: String::new(),
        code: output,
    })
}

fn render_statement(
    registration: &RegistrationSpec,
    imports: &mut Imports,
    config: &GeneratorConfig,
) -> String {
    let mapper_ref = &registration.mapper;
    let mapper = imports.reference(&config.mapper_path(&mapper_ref.mapper_name));
    let constructor = if mapper_ref.singleton {
        format!("{mapper}::instance")
    } else {
        format!("{mapper}::new")
    };

    let declaration = match (registration.style, registration.lifecycle) {
        (RegistrationStyle::Constructor, Lifecycle::Singleton) => format!("single_of({constructor})"),
        (RegistrationStyle::Constructor, Lifecycle::Factory) => format!("factory_of({constructor})"),
        (RegistrationStyle::Lambda, Lifecycle::Singleton) => format!("single(|| {constructor}())"),
        (RegistrationStyle::Lambda, Lifecycle::Factory) => format!("factory(|| {constructor}())"),
    };

    let mut clauses = vec![declaration];
    match &registration.qualifier {
        Some(Qualifier::Named(name)) => clauses.push(format!("named({name:?})")),
        Some(Qualifier::Type(path)) => {
            let qualifier = imports.reference(path);
            clauses.push(format!("qualified_by::<{qualifier}>()"));
        }
        None => {}
    }
    if registration.eager_start {
        clauses.push("created_at_start()".to_string());
    }
    if registration.bind_interfaces {
        let contract_name = if mapper_ref.is_async {
            "AsyncMapperContract"
        } else {
            "MapperContract"
        };
        let contract = imports.reference(&format!("{}::{contract_name}", config.runtime_path));
        let source = imports.reference(&mapper_ref.source_type);
        let target = imports.reference(&mapper_ref.target_type);
        clauses.push(format!(
            "bind::<{contract}<{}, {}>>()",
            side_type(&source, mapper_ref.source_nullable),
            side_type(&target, mapper_ref.target_nullable),
        ));
    }

    let mut statement = String::from("    module");
    if let [only] = clauses.as_slice() {
        statement.push('.');
        statement.push_str(only);
    } else {
        for clause in &clauses {
            statement.push_str("\n        .");
            statement.push_str(clause);
        }
    }
    statement.push_str(";\n");
    statement
}
