#![allow(non_snake_case)]

use super::*;
use crate::codegen::derive::ShapeDeriver;
use crate::codegen::discover::SchemaIndex;
use crate::manifest::Manifest;

const PACKAGE: &str = "com.example.dsl";

fn render(toml: &str, element: &str) -> String {
    let manifest = Manifest::from_toml(toml).unwrap();
    let index = SchemaIndex::build(&manifest).unwrap();
    let id = index.resolve(element).unwrap();
    let shape = ShapeDeriver::new(&index, PACKAGE).derive(id).unwrap();
    builder_file(&parts(&shape), PACKAGE).render("    ")
}

const PROXY: &str = r#"
[[class]]
name = "ServiceProxy"
package = "com.example.rules"
element = "serviceProxy"

[[class.child]]
setter = "setTarget"
parameter = "Target"

[[class.child]]
setter = "setInterceptors"
parameter = "java.util.List<Interceptor>"

[[class]]
name = "Target"
package = "com.example.rules"
element = "target"

[[class.attribute]]
setter = "setHost"
type = "String"
required = true

[[class.attribute]]
setter = "setPort"
type = "int"
required = true

[[class]]
name = "Interceptor"
package = "com.example.interceptor"
abstract = true

[[class]]
name = "LogInterceptor"
package = "com.example.interceptor"
element = "log"
supertypes = ["Interceptor"]

[[class.attribute]]
setter = "setHeaderOnly"
type = "boolean"

[class.sample.getters]
isHeaderOnly = false

[[class]]
name = "RewriteInterceptor"
package = "com.example.interceptor"
element = "rewriter"
supertypes = ["Interceptor"]

[[class.child]]
setter = "setMappings"
parameter = "List<Mapping>"

[[class]]
name = "Mapping"
package = "com.example.interceptor"
enclosing = "RewriteInterceptor"
element = "map"

[[class.attribute]]
setter = "setFrom"
type = "String"
required = true

[[class.attribute]]
setter = "setTo"
type = "String"
required = true
"#;

#[test]
fn parts___element_with_required_attributes___matches_expected_builder() {
    let code = render(PROXY, "ServiceProxy");

    assert!(code.contains(
        "    fun target(host: String, port: Int) {\n\
         \x20       val target = Target().apply {\n\
         \x20           setHost(host)\n\
         \x20           setPort(port)\n\
         \x20       }\n\
         \x20       serviceProxy.target = target\n\
         \x20   }\n"
    ));
}

#[test]
fn parts___abstract_child___one_function_per_concrete_subtype() {
    let code = render(PROXY, "ServiceProxy");

    assert!(code.contains("    fun log(isHeaderOnly: Boolean = false) {\n"));
    assert!(code.contains(
        "    fun rewriter(init: RewriteInterceptorSpec.() -> Unit = {}) {\n\
         \x20       val rewriteInterceptor = RewriteInterceptor()\n\
         \x20       RewriteInterceptorSpec(rewriteInterceptor).init()\n\
         \x20       serviceProxy.interceptors.add(rewriteInterceptor)\n\
         \x20   }\n"
    ));
    assert!(code.contains("        serviceProxy.interceptors.add(logInterceptor)\n"));
}

#[test]
fn parts___counts_functions() {
    let manifest = Manifest::from_toml(PROXY).unwrap();
    let index = SchemaIndex::build(&manifest).unwrap();
    let id = index.resolve("ServiceProxy").unwrap();
    let shape = ShapeDeriver::new(&index, PACKAGE).derive(id).unwrap();

    let parts = parts(&shape);

    assert_eq!(parts.name, "ServiceProxySpec");
    assert_eq!(parts.property, "serviceProxy");
    assert_eq!(parts.functions.len(), 3);
    assert_eq!(parts.functions.len(), shape.function_count());
}

#[test]
fn builder_file___writes_header_package_imports_and_class() {
    let code = render(PROXY, "ServiceProxy");

    assert!(code.starts_with(
        "// Generated by proxydsl. Do not edit.\n\
         \n\
         package com.example.dsl\n\
         \n\
         import com.example.interceptor.LogInterceptor\n\
         import com.example.interceptor.RewriteInterceptor\n\
         import com.example.rules.ServiceProxy\n\
         import com.example.rules.Target\n\
         \n\
         class ServiceProxySpec(val serviceProxy: ServiceProxy) {\n"
    ));
}

#[test]
fn builder_file___nested_class_is_imported_by_simple_name() {
    let code = render(PROXY, "RewriteInterceptor");

    assert!(code.contains("import com.example.interceptor.RewriteInterceptor.Mapping\n"));
    assert!(code.contains("class RewriteInterceptorSpec(val rewriteInterceptor: RewriteInterceptor) {\n"));
    assert!(code.contains("    fun map(from: String, to: String) {\n"));
    assert!(code.contains("        rewriteInterceptor.mappings.add(mapping)\n"));
}

#[test]
fn builder_file___leaf_element_has_no_body() {
    let code = render(PROXY, "Target");

    assert!(code.ends_with("class TargetSpec(val target: Target)\n"));
}

#[test]
fn builder_file___child_without_attributes_skips_apply() {
    let toml = r#"
[[class]]
name = "Router"
package = "p"
element = "router"

[[class.child]]
setter = "setTransport"
parameter = "Transport"

[[class]]
name = "Transport"
package = "p"
element = "transport"
"#;

    let code = render(toml, "Router");

    assert!(code.contains(
        "    fun transport() {\n\
         \x20       val transport = Transport()\n\
         \x20       router.transport = transport\n\
         \x20   }\n"
    ));
}

#[test]
fn builder_file___nested_init_never_shadows_lambda() {
    let toml = r#"
[[class]]
name = "Router"
package = "p"
element = "router"

[[class.child]]
setter = "setStartup"
parameter = "Init"

[[class]]
name = "Init"
package = "p"
element = "startup"

[[class.attribute]]
setter = "setInit"
type = "String"
required = true

[[class.child]]
setter = "setStep"
parameter = "Step"

[[class]]
name = "Step"
package = "p"
element = "step"
"#;

    let code = render(toml, "Router");

    assert!(code.contains(
        "    fun startup(initValue: String, init: InitSpec.() -> Unit = {}) {\n\
         \x20       val childInit = Init().apply {\n\
         \x20           setInit(initValue)\n\
         \x20       }\n\
         \x20       InitSpec(childInit).init()\n\
         \x20       router.startup = childInit\n\
         \x20   }\n"
    ));
}

#[test]
fn builder_file___clashing_simple_names_are_qualified() {
    let toml = r#"
[[class]]
name = "Target"
package = "com.example.rules"
element = "holder"

[[class.child]]
setter = "setTarget"
parameter = "com.other.Outer.Target"

[[class]]
name = "Target"
package = "com.other"
enclosing = "Outer"
element = "target"
"#;

    let code = render(toml, "com.example.rules.Target");

    assert!(!code.contains("import"));
    assert!(code.contains("class TargetSpec(val target: com.example.rules.Target) {\n"));
    assert!(code.contains("        val childTarget = com.other.Outer.Target()\n"));
}

#[test]
fn builder_file___optional_defaults_are_rendered() {
    let toml = r#"
[[class]]
name = "Proxy"
package = "p"
element = "proxy"

[[class.child]]
setter = "setPath"
parameter = "Path"

[[class]]
name = "Path"
package = "p"
element = "path"

[[class.attribute]]
setter = "setValue"
type = "String"
text_content = true

[[class.attribute]]
setter = "setRegExp"
type = "boolean"

[[class.attribute]]
setter = "setMethod"
type = "com.example.http.Method"
enum = true

[[class.attribute]]
setter = "setCharset"
type = "String"

[class.sample.getters]
getMethod = "GET"
"#;

    let code = render(toml, "Proxy");

    assert!(code.contains("import com.example.http.Method\n"));
    assert!(code.contains(
        "    fun path(value: String, isRegExp: Boolean = false, method: Method? = Method.GET, charset: String? = null) {\n"
    ));
}

#[test]
fn entry_file___constructs_root_and_applies_builder() {
    let root = ClassName::top_level("com.example.proxy", "HttpRouter");
    let spec = ClassName::top_level(PACKAGE, "RouterSpec");

    let code = entry_file("router", &root, &spec, PACKAGE).render("    ");

    assert_eq!(
        code,
        "// Generated by proxydsl. Do not edit.\n\
         \n\
         package com.example.dsl\n\
         \n\
         import com.example.proxy.HttpRouter\n\
         \n\
         fun router(init: RouterSpec.() -> Unit = {}): HttpRouter {\n\
         \x20   val httpRouter = HttpRouter()\n\
         \x20   RouterSpec(httpRouter).init()\n\
         \x20   return httpRouter\n\
         }\n"
    );
}

#[test]
fn entry_file_name___capitalizes_function() {
    assert_eq!(entry_file_name("router"), "RouterDsl");
}
