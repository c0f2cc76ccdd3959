//! Kotlin source model and renderer.
//!
//! Builders are assembled as [`FileSpec`] / [`TypeSpec`] / [`FunSpec`] values
//! whose code fragments keep class references symbolic ([`Code::ty`]). When a
//! file is rendered, every referenced class is either imported and written by
//! its simple name, or, if two different classes in the file share a simple
//! name, written fully qualified at every use.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// Package whose classes Kotlin imports implicitly.
const KOTLIN_PACKAGE: &str = "kotlin";

/// A class reference: package plus the chain of (possibly nested) class names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    package: String,
    names: Vec<String>,
}

impl ClassName {
    /// Create a class name from its package and nesting chain.
    pub fn new(package: impl Into<String>, names: Vec<String>) -> Self {
        Self {
            package: package.into(),
            names,
        }
    }

    /// A top-level class.
    pub fn top_level(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(package, vec![name.into()])
    }

    /// A class from the implicitly imported `kotlin` package.
    pub fn kotlin(name: &str) -> Self {
        Self::top_level(KOTLIN_PACKAGE, name)
    }

    /// Split a qualified name using the Java convention that package
    /// segments start lowercase and class segments start uppercase.
    pub fn parse(qualified: &str) -> Self {
        let segments: Vec<&str> = qualified.split('.').collect();
        let first_class = segments
            .iter()
            .position(|s| s.chars().next().is_some_and(char::is_uppercase))
            .unwrap_or(segments.len().saturating_sub(1));
        Self {
            package: segments[..first_class].join("."),
            names: segments[first_class..]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Package of the class.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Innermost class name.
    pub fn simple_name(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or_default()
    }

    /// Name relative to the package (`Outer.Inner`).
    pub fn nested_name(&self) -> String {
        self.names.join(".")
    }

    /// Fully qualified name.
    pub fn canonical(&self) -> String {
        if self.package.is_empty() {
            self.nested_name()
        } else {
            format!("{}.{}", self.package, self.nested_name())
        }
    }
}

/// A type used in a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    /// A class, optionally nullable
    Class { class: ClassName, nullable: bool },
    /// A lambda with receiver returning `Unit`: `Receiver.() -> Unit`
    ReceiverLambda { receiver: ClassName },
}

impl TypeName {
    /// Non-nullable class type.
    pub fn class(class: ClassName) -> Self {
        TypeName::Class {
            class,
            nullable: false,
        }
    }

    /// Class type with explicit nullability.
    pub fn with_nullability(class: ClassName, nullable: bool) -> Self {
        TypeName::Class { class, nullable }
    }

    /// `Receiver.() -> Unit`
    pub fn receiver_lambda(receiver: ClassName) -> Self {
        TypeName::ReceiverLambda { receiver }
    }

    /// Whether the type admits `null`.
    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeName::Class { nullable: true, .. })
    }

    fn collect_classes<'a>(&'a self, out: &mut Vec<&'a ClassName>) {
        match self {
            TypeName::Class { class, .. } => out.push(class),
            TypeName::ReceiverLambda { receiver } => out.push(receiver),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CodePart {
    Text(String),
    Type(ClassName),
}

/// A code fragment with symbolic class references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Code {
    parts: Vec<CodePart>,
}

impl Code {
    /// Empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fragment holding only text.
    pub fn of(text: impl Into<String>) -> Self {
        Self::new().text(text)
    }

    /// Append literal text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(CodePart::Text(text.into()));
        self
    }

    /// Append a class reference.
    pub fn ty(mut self, class: &ClassName) -> Self {
        self.parts.push(CodePart::Type(class.clone()));
        self
    }

    fn collect_classes<'a>(&'a self, out: &mut Vec<&'a ClassName>) {
        out.extend(self.parts.iter().filter_map(|part| match part {
            CodePart::Type(class) => Some(class),
            CodePart::Text(_) => None,
        }));
    }
}

/// A function parameter, or a `val` constructor property.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: TypeName,
    pub default: Option<Code>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: TypeName) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Code) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Line(Code),
    BeginBlock(Code),
    EndBlock,
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunSpec {
    pub name: String,
    pub parameters: Vec<ParameterSpec>,
    pub returns: Option<TypeName>,
    body: Vec<Statement>,
}

impl FunSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            returns: None,
            body: Vec::new(),
        }
    }

    pub fn add_parameter(&mut self, parameter: ParameterSpec) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returns(&mut self, ty: TypeName) -> &mut Self {
        self.returns = Some(ty);
        self
    }

    /// Add a single statement line.
    pub fn add_statement(&mut self, code: Code) -> &mut Self {
        self.body.push(Statement::Line(code));
        self
    }

    /// Open a `{` block after `code` and indent what follows.
    pub fn begin_control_flow(&mut self, code: Code) -> &mut Self {
        self.body.push(Statement::BeginBlock(code));
        self
    }

    /// Close the innermost open block.
    pub fn end_control_flow(&mut self) -> &mut Self {
        self.body.push(Statement::EndBlock);
        self
    }

    fn collect_classes<'a>(&'a self, out: &mut Vec<&'a ClassName>) {
        for parameter in &self.parameters {
            parameter.ty.collect_classes(out);
            if let Some(default) = &parameter.default {
                default.collect_classes(out);
            }
        }
        if let Some(returns) = &self.returns {
            returns.collect_classes(out);
        }
        for statement in &self.body {
            if let Statement::Line(code) | Statement::BeginBlock(code) = statement {
                code.collect_classes(out);
            }
        }
    }
}

/// A class whose primary constructor declares `val` properties.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: String,
    pub properties: Vec<ParameterSpec>,
    pub functions: Vec<FunSpec>,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            functions: Vec::new(),
        }
    }
}

/// One Kotlin source file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSpec {
    pub package: String,
    pub name: String,
    pub comment: Option<String>,
    pub types: Vec<TypeSpec>,
    pub functions: Vec<FunSpec>,
}

impl FileSpec {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            comment: None,
            types: Vec::new(),
            functions: Vec::new(),
        }
    }

    /// Render the file using `indent` as one indentation level.
    pub fn render(&self, indent: &str) -> String {
        let names = NameTable::build(self);
        let mut out = Renderer {
            out: String::new(),
            indent,
            names: &names,
        };
        out.file(self);
        out.out
    }

    fn referenced_classes(&self) -> Vec<&ClassName> {
        let mut classes = Vec::new();
        for ty in &self.types {
            for property in &ty.properties {
                property.ty.collect_classes(&mut classes);
            }
            for function in &ty.functions {
                function.collect_classes(&mut classes);
            }
        }
        for function in &self.functions {
            function.collect_classes(&mut classes);
        }
        classes
    }
}

/// Decides how each class is written in one file.
struct NameTable {
    ambiguous: BTreeSet<String>,
    imports: BTreeSet<String>,
}

impl NameTable {
    fn build(file: &FileSpec) -> Self {
        let declared: Vec<ClassName> = file
            .types
            .iter()
            .map(|ty| ClassName::top_level(file.package.clone(), ty.name.clone()))
            .collect();
        let referenced = file.referenced_classes();

        let mut by_simple: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for class in declared.iter().chain(referenced.iter().copied()) {
            by_simple
                .entry(class.simple_name())
                .or_default()
                .insert(class.canonical());
        }

        let ambiguous: BTreeSet<String> = by_simple
            .iter()
            .filter(|(_, canonical)| canonical.len() > 1)
            .map(|(simple, _)| simple.to_string())
            .collect();

        let imports = referenced
            .iter()
            .filter(|class| !ambiguous.contains(class.simple_name()))
            .filter(|class| {
                let implicit = class.package() == file.package || class.package() == KOTLIN_PACKAGE;
                !implicit || class.names.len() > 1
            })
            .map(|class| class.canonical())
            .collect();

        Self { ambiguous, imports }
    }

    fn name_of(&self, class: &ClassName) -> String {
        if self.ambiguous.contains(class.simple_name()) {
            class.canonical()
        } else {
            class.simple_name().to_string()
        }
    }
}

struct Renderer<'a> {
    out: String,
    indent: &'a str,
    names: &'a NameTable,
}

impl Renderer<'_> {
    fn file(&mut self, file: &FileSpec) {
        if let Some(comment) = &file.comment {
            for line in comment.lines() {
                let _ = writeln!(self.out, "// {line}");
            }
            self.out.push('\n');
        }

        let _ = writeln!(self.out, "package {}", file.package);

        if !self.names.imports.is_empty() {
            self.out.push('\n');
            for import in &self.names.imports {
                let _ = writeln!(self.out, "import {import}");
            }
        }

        for ty in &file.types {
            self.out.push('\n');
            self.type_spec(ty);
        }

        for function in &file.functions {
            self.out.push('\n');
            self.function(function, 0);
        }
    }

    fn type_spec(&mut self, ty: &TypeSpec) {
        let properties: Vec<String> = ty
            .properties
            .iter()
            .map(|p| format!("val {}", self.parameter(p)))
            .collect();
        let _ = write!(self.out, "class {}({})", ty.name, properties.join(", "));

        if ty.functions.is_empty() {
            self.out.push('\n');
            return;
        }

        self.out.push_str(" {\n");
        for (i, function) in ty.functions.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.function(function, 1);
        }
        self.out.push_str("}\n");
    }

    fn function(&mut self, function: &FunSpec, depth: usize) {
        let parameters: Vec<String> = function
            .parameters
            .iter()
            .map(|p| self.parameter(p))
            .collect();
        let returns = function
            .returns
            .as_ref()
            .map(|ty| format!(": {}", self.type_name(ty)))
            .unwrap_or_default();

        self.line(
            depth,
            &format!(
                "fun {}({}){returns} {{",
                function.name,
                parameters.join(", ")
            ),
        );

        let mut level = depth + 1;
        for statement in &function.body {
            match statement {
                Statement::Line(code) => {
                    let text = self.code(code);
                    self.line(level, &text);
                }
                Statement::BeginBlock(code) => {
                    let text = format!("{} {{", self.code(code));
                    self.line(level, &text);
                    level += 1;
                }
                Statement::EndBlock => {
                    level = level.saturating_sub(1).max(depth + 1);
                    self.line(level, "}");
                }
            }
        }

        self.line(depth, "}");
    }

    fn parameter(&self, parameter: &ParameterSpec) -> String {
        let mut text = format!("{}: {}", parameter.name, self.type_name(&parameter.ty));
        if let Some(default) = &parameter.default {
            text.push_str(" = ");
            text.push_str(&self.code(default));
        }
        text
    }

    fn type_name(&self, ty: &TypeName) -> String {
        match ty {
            TypeName::Class { class, nullable } => {
                let name = self.names.name_of(class);
                if *nullable { format!("{name}?") } else { name }
            }
            TypeName::ReceiverLambda { receiver } => {
                format!("{}.() -> Unit", self.names.name_of(receiver))
            }
        }
    }

    fn code(&self, code: &Code) -> String {
        code.parts
            .iter()
            .map(|part| match part {
                CodePart::Text(text) => text.clone(),
                CodePart::Type(class) => self.names.name_of(class),
            })
            .collect()
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(self.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}

/// Quote a string as a Kotlin string literal.
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '$' => literal.push_str("\\$"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            other => literal.push(other),
        }
    }
    literal.push('"');
    literal
}
