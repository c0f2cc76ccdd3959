//! Builder synthesis: [`ElementShape`] to Kotlin file model.
//!
//! Each shape becomes one class wrapping the host instance, with one
//! function per relationship and concrete target:
//!
//! ```kotlin
//! class ServiceProxySpec(val serviceProxy: ServiceProxy) {
//!     fun target(host: String, port: Int) {
//!         val target = Target().apply {
//!             setHost(host)
//!             setPort(port)
//!         }
//!         serviceProxy.target = target
//!     }
//! }
//! ```

use super::ir::{Cardinality, ChildRelationship, ChildTarget, ElementShape, INIT_PARAMETER, Parts};
use super::kotlin::{ClassName, Code, FileSpec, FunSpec, ParameterSpec, TypeName, TypeSpec};
use super::naming;

/// Header written at the top of every generated file.
pub const GENERATED_HEADER: &str = "Generated by proxydsl. Do not edit.";

/// Build the parts of one builder class.
pub fn parts(shape: &ElementShape) -> Parts {
    let functions = shape
        .relationships
        .iter()
        .flat_map(|relationship| {
            relationship
                .targets
                .iter()
                .map(move |target| child_function(&shape.property, relationship, target))
        })
        .collect();

    Parts {
        name: shape.spec.simple_name().to_string(),
        constructor: ParameterSpec::new(shape.property.clone(), TypeName::class(shape.host.clone())),
        property: shape.property.clone(),
        functions,
    }
}

fn child_function(owner: &str, relationship: &ChildRelationship, target: &ChildTarget) -> FunSpec {
    let mut function = FunSpec::new(target.function.clone());

    for attribute in &target.attributes {
        function.add_parameter(attribute.parameter_spec());
    }
    if let Some(nested) = &target.nested_spec {
        function.add_parameter(init_parameter(nested));
    }

    let create = Code::of(format!("val {} = ", target.local))
        .ty(&target.class)
        .text("()");
    if target.attributes.is_empty() {
        function.add_statement(create);
    } else {
        function.begin_control_flow(create.text(".apply"));
        for attribute in &target.attributes {
            function.add_statement(Code::of(format!(
                "{}({})",
                attribute.setter, attribute.parameter
            )));
        }
        function.end_control_flow();
    }

    if let Some(nested) = &target.nested_spec {
        function.add_statement(
            Code::new()
                .ty(nested)
                .text(format!("({}).{INIT_PARAMETER}()", target.local)),
        );
    }

    let attach = match relationship.cardinality {
        Cardinality::Single => format!("{owner}.{} = {}", relationship.accessor, target.local),
        Cardinality::Repeatable => {
            format!("{owner}.{}.add({})", relationship.accessor, target.local)
        }
    };
    function.add_statement(Code::of(attach));

    function
}

fn init_parameter(spec: &ClassName) -> ParameterSpec {
    ParameterSpec::new(INIT_PARAMETER, TypeName::receiver_lambda(spec.clone()))
        .with_default(Code::of("{}"))
}

/// Wrap builder parts in a class declaration.
pub fn type_spec(parts: &Parts) -> TypeSpec {
    let mut ty = TypeSpec::new(parts.name.clone());
    ty.properties.push(parts.constructor.clone());
    ty.functions = parts.functions.clone();
    ty
}

/// One source file holding one builder class.
pub fn builder_file(parts: &Parts, package: &str) -> FileSpec {
    let mut file = FileSpec::new(package, parts.name.clone());
    file.comment = Some(GENERATED_HEADER.to_string());
    file.types.push(type_spec(parts));
    file
}

/// Name of the file holding the top-level entry function.
pub fn entry_file_name(function: &str) -> String {
    format!("{}Dsl", naming::capitalize(function))
}

/// Top-level function constructing `root`, configuring it through
/// `spec`, and returning it.
///
/// ```kotlin
/// fun router(init: RouterSpec.() -> Unit = {}): HttpRouter {
///     val httpRouter = HttpRouter()
///     RouterSpec(httpRouter).init()
///     return httpRouter
/// }
/// ```
pub fn entry_file(function: &str, root: &ClassName, spec: &ClassName, package: &str) -> FileSpec {
    let mut local = naming::type_to_property_name(root.simple_name());
    if local == INIT_PARAMETER {
        local = format!("root{}", naming::capitalize(&local));
    }
    let local = naming::escape_identifier(&local);

    let mut entry = FunSpec::new(naming::escape_identifier(function));
    entry
        .add_parameter(init_parameter(spec))
        .returns(TypeName::class(root.clone()))
        .add_statement(Code::of(format!("val {local} = ")).ty(root).text("()"))
        .add_statement(Code::new().ty(spec).text(format!("({local}).{INIT_PARAMETER}()")))
        .add_statement(Code::of(format!("return {local}")));

    let mut file = FileSpec::new(package, entry_file_name(function));
    file.comment = Some(GENERATED_HEADER.to_string());
    file.functions.push(entry);
    file
}

#[cfg(test)]
#[path = "builder/builder_tests.rs"]
mod builder_tests;
