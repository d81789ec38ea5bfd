// crates/slack-function-testgen/src/ir.rs
// ============================================================================
// Module: Test Module IR
// Description: Structured representation of a generated test file.
// Purpose: Separate what a test file contains from how it is spelled.
// Dependencies: slack-schema-types
// ============================================================================

//! ## Overview
//! A [`TestModule`] is the whole generated file: header comment, import
//! declarations, and test cases. Each [`TestCase`] holds a list of
//! [`Statement`]s. [`TestModule::render`] is the single formatter that turns
//! the tree into source text.
//!
//! Layout of the rendered text:
//! - header, one import per line, a blank line,
//! - test declarations separated by blank lines,
//! - each declaration `<runner>("<title>", () => {<statements>});` with
//!   statements joined by `\n`,
//! - no trailing newline.

use std::fmt;

use slack_schema_types::typescript_string_literal;

// ============================================================================
// SECTION: Imports
// ============================================================================

/// Binding form of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportClause {
    /// `import { a, b } from "..."`.
    Named(Vec<String>),
    /// `import A from "..."`.
    Default(String),
}

/// One `import` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Imported bindings.
    pub clause: ImportClause,
    /// Module specifier.
    pub source: String,
}

impl ImportDecl {
    /// Creates a named import.
    #[must_use]
    pub fn named<I, S>(names: I, source: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clause: ImportClause::Named(names.into_iter().map(Into::into).collect()),
            source: source.into(),
        }
    }

    /// Creates a default import.
    #[must_use]
    pub fn default_binding(binding: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            clause: ImportClause::Default(binding.into()),
            source: source.into(),
        }
    }

    /// Returns true when the declaration binds `name`.
    #[must_use]
    pub fn binds(&self, name: &str) -> bool {
        match &self.clause {
            ImportClause::Named(names) => names.iter().any(|bound| bound == name),
            ImportClause::Default(binding) => binding == name,
        }
    }
}

impl fmt::Display for ImportDecl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.clause {
            ImportClause::Named(names) => write!(
                formatter,
                "import {{ {} }} from {};",
                names.join(", "),
                typescript_string_literal(&self.source)?
            ),
            ImportClause::Default(binding) => {
                let source = typescript_string_literal(&self.source)?;
                write!(formatter, "import {binding} from {source};")
            }
        }
    }
}

// ============================================================================
// SECTION: Statements
// ============================================================================

/// One statement inside a test body.
///
/// Expressions are stored already rendered; the variant records the role the
/// statement plays so callers can match on structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `const <name>[: <annotation>] = <value>;`
    Const {
        /// Binding name.
        name: String,
        /// Optional type annotation.
        annotation: Option<String>,
        /// Initializer expression.
        value: String,
    },
    /// `assertEquals(<actual>, <expected>);`
    AssertEquals {
        /// Actual expression.
        actual: String,
        /// Expected expression.
        expected: String,
    },
    /// `assertExists(<expression>);`
    AssertExists(String),
    /// `<expression>;`
    Expression(String),
    /// Empty line.
    Blank,
}

impl Statement {
    /// Creates an unannotated `const` binding.
    #[must_use]
    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Const {
            name: name.into(),
            annotation: None,
            value: value.into(),
        }
    }

    /// Creates an `assertEquals` call.
    #[must_use]
    pub fn assert_equals(actual: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::AssertEquals {
            actual: actual.into(),
            expected: expected.into(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const {
                name,
                annotation: Some(annotation),
                value,
            } => write!(formatter, "const {name}: {annotation} = {value};"),
            Self::Const {
                name,
                annotation: None,
                value,
            } => write!(formatter, "const {name} = {value};"),
            Self::AssertEquals {
                actual,
                expected,
            } => write!(formatter, "assertEquals({actual}, {expected});"),
            Self::AssertExists(expression) => write!(formatter, "assertExists({expression});"),
            Self::Expression(expression) => write!(formatter, "{expression};"),
            Self::Blank => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Test Cases
// ============================================================================

/// One test declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Human-readable test title.
    pub title: String,
    /// Statements of the zero-argument test body.
    pub body: Vec<Statement>,
}

impl TestCase {
    /// Renders the declaration using `runner` as the registration call.
    fn render(&self, runner: &str) -> Result<String, fmt::Error> {
        let body: Vec<String> = self.body.iter().map(ToString::to_string).collect();
        let title = typescript_string_literal(&self.title)?;
        Ok(format!("{runner}({title}, () => {{{}}});", body.join("\n")))
    }
}

// ============================================================================
// SECTION: Module
// ============================================================================

/// Complete generated test file.
///
/// # Invariants
/// - `imports` render in order; callers build them already ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestModule {
    /// First-line marker comment.
    pub header: String,
    /// Test registration call, e.g. `Deno.test`.
    pub runner: String,
    /// Import declarations.
    pub imports: Vec<ImportDecl>,
    /// Test declarations.
    pub tests: Vec<TestCase>,
}

impl TestModule {
    /// Returns the number of test declarations.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Renders the module as source text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TestModule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::with_capacity(self.imports.len() + self.tests.len() * 2 + 2);
        lines.push(self.header.clone());
        for import in &self.imports {
            lines.push(import.to_string());
        }
        for test in &self.tests {
            lines.push(String::new());
            lines.push(test.render(&self.runner)?);
        }
        formatter.write_str(&lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_default_imports_render() {
        let named = ImportDecl::named(["assertEquals", "assertExists"], "../dev_deps.ts");
        assert_eq!(named.to_string(), "import { assertEquals, assertExists } from \"../dev_deps.ts\";");
        let default = ImportDecl::default_binding("AddPin", "./add_pin.ts");
        assert_eq!(default.to_string(), "import AddPin from \"./add_pin.ts\";");
        assert!(named.binds("assertExists"));
        assert!(!default.binds("assertExists"));
    }

    #[test]
    fn statements_render_as_single_lines() {
        let annotated = Statement::Const {
            name: "expected".to_string(),
            annotation: Some("ManifestFunctionSchema".to_string()),
            value: "{}".to_string(),
        };
        assert_eq!(annotated.to_string(), "const expected: ManifestFunctionSchema = {};");
        assert_eq!(Statement::constant("actual", "f()").to_string(), "const actual = f();");
        assert_eq!(Statement::assert_equals("a", "b").to_string(), "assertEquals(a, b);");
        assert_eq!(Statement::AssertExists("x.y".to_string()).to_string(), "assertExists(x.y);");
        assert_eq!(Statement::Expression("go()".to_string()).to_string(), "go();");
        assert_eq!(Statement::Blank.to_string(), "");
    }

    #[test]
    fn module_separates_tests_with_blank_lines() {
        let module = TestModule {
            header: "// header".to_string(),
            runner: "Deno.test".to_string(),
            imports: vec![ImportDecl::named(["assertEquals"], "./deps.ts")],
            tests: vec![
                TestCase {
                    title: "first".to_string(),
                    body: vec![Statement::Expression("a()".to_string()), Statement::Blank],
                },
                TestCase {
                    title: "second".to_string(),
                    body: Vec::new(),
                },
            ],
        };
        let expected = "// header\n\
                        import { assertEquals } from \"./deps.ts\";\n\
                        \n\
                        Deno.test(\"first\", () => {a();\n});\n\
                        \n\
                        Deno.test(\"second\", () => {});";
        assert_eq!(module.render(), expected);
        assert_eq!(module.test_count(), 2);
    }
}
