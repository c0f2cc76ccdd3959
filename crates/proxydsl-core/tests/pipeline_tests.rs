//! End-to-end generation from the Membrane demo manifest.

#![allow(non_snake_case)]

use proxydsl_core::{Manifest, run};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const MEMBRANE: &str = include_str!("../../../demos/membrane/proxydsl.toml");

fn generate(dir: &TempDir) -> Manifest {
    let manifest = Manifest::from_toml(MEMBRANE).unwrap();
    let config = manifest.generator.clone().with_output_dir(dir.path());

    let summary = run(&manifest, &config).unwrap();

    assert!(summary.is_success(), "failures: {:?}", summary.failures);
    manifest
}

fn read(dir: &TempDir, type_name: &str) -> String {
    let path = dir
        .path()
        .join("com/predic8/membrane/dsl")
        .join(format!("{type_name}.kt"));
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
}

#[test]
fn membrane___writes_one_file_per_element_plus_entry() {
    let dir = TempDir::new().unwrap();
    generate(&dir);

    let mut names: Vec<String> = fs::read_dir(dir.path().join("com/predic8/membrane/dsl"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            "AbstractServiceProxyTargetSpec.kt",
            "LogInterceptorSpec.kt",
            "PathSpec.kt",
            "ProxyRuleSpec.kt",
            "RewriteInterceptorMappingSpec.kt",
            "RewriteInterceptorSpec.kt",
            "RouterDsl.kt",
            "RouterSpec.kt",
            "ServiceProxySpec.kt",
        ]
    );
}

#[test]
fn membrane___router_accepts_every_concrete_rule() {
    let dir = TempDir::new().unwrap();
    generate(&dir);

    let router = read(&dir, "RouterSpec");

    assert!(router.contains("class RouterSpec(val router: Router) {\n"));
    assert!(router.contains(
        "    fun serviceProxy(name: String? = null, port: Int = 80, host: String = \"*\", init: ServiceProxySpec.() -> Unit = {}) {\n\
         \x20       val serviceProxy = ServiceProxy().apply {\n\
         \x20           setName(name)\n\
         \x20           setPort(port)\n\
         \x20           setHost(host)\n\
         \x20       }\n\
         \x20       ServiceProxySpec(serviceProxy).init()\n\
         \x20       router.rules.add(serviceProxy)\n\
         \x20   }\n"
    ));
    assert!(router.contains("    fun proxy(name: String? = null, port: Int = 8080, init: ProxyRuleSpec.() -> Unit = {}) {\n"));
    assert!(router.contains("        router.rules.add(proxyRule)\n"));
}

#[test]
fn membrane___service_proxy_nests_interceptors_path_and_target() {
    let dir = TempDir::new().unwrap();
    generate(&dir);

    let proxy = read(&dir, "ServiceProxySpec");

    assert!(proxy.contains("import com.predic8.membrane.core.rules.AbstractServiceProxy.Target\n"));
    assert!(proxy.contains("import com.predic8.membrane.core.interceptor.log.LogInterceptor.Level\n"));

    let functions: Vec<&str> = proxy
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("fun "))
        .map(|rest| rest.split('(').next().unwrap())
        .collect();
    assert_eq!(functions, vec!["rewriter", "log", "path", "target"]);

    assert!(proxy.contains("    fun path(value: String, isRegExp: Boolean = false) {\n"));
    assert!(proxy.contains("        serviceProxy.path = path\n"));
    assert!(proxy.contains("    fun target(host: String? = null, port: Int = 80, url: String? = null) {\n"));
    assert!(proxy.contains("        serviceProxy.target = target\n"));
    assert!(proxy.contains("    fun log(isHeaderOnly: Boolean = false, level: Level? = Level.INFO) {\n"));
    assert!(proxy.contains("        serviceProxy.interceptors.add(rewriteInterceptor)\n"));
}

#[test]
fn membrane___rewriter_escapes_keyword_parameter() {
    let dir = TempDir::new().unwrap();
    generate(&dir);

    let rewriter = read(&dir, "RewriteInterceptorSpec");

    assert!(rewriter.contains(
        "    fun map(from: String, to: String, `do`: Type? = Type.REWRITE) {\n\
         \x20       val mapping = Mapping().apply {\n\
         \x20           setFrom(from)\n\
         \x20           setTo(to)\n\
         \x20           setDo(`do`)\n\
         \x20       }\n\
         \x20       rewriteInterceptor.mappings.add(mapping)\n\
         \x20   }\n"
    ));
}

#[test]
fn membrane___entry_function_builds_http_router() {
    let dir = TempDir::new().unwrap();
    generate(&dir);

    let entry = read(&dir, "RouterDsl");

    assert!(entry.contains("import com.predic8.membrane.core.HttpRouter\n"));
    assert!(entry.contains("fun router(init: RouterSpec.() -> Unit = {}): HttpRouter {\n"));
    assert!(entry.contains("    RouterSpec(httpRouter).init()\n"));
}

#[test]
fn membrane___second_run_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    generate(&dir);
    let first = read(&dir, "ServiceProxySpec");

    generate(&dir);

    assert_eq!(read(&dir, "ServiceProxySpec"), first);
}

#[test]
fn membrane___json_manifest_matches_toml() {
    let manifest = Manifest::from_toml(MEMBRANE).unwrap();
    let json = serde_json::to_string(&manifest).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("proxydsl.json");
    fs::write(&path, json).unwrap();

    let reloaded = Manifest::from_file(Path::new(&path)).unwrap();

    assert_eq!(reloaded.classes, manifest.classes);
    assert_eq!(reloaded.generator, manifest.generator);
}
