// crates/slack-function-testgen/src/template.rs
// ============================================================================
// Module: Test Template
// Description: Builds the test module for one Slack function record.
// Purpose: Assemble imports and test cases, then render them once.
// Dependencies: slack-schema-types
// ============================================================================

//! ## Overview
//! [`TestGenerator::build`] validates a [`FunctionRecord`] and assembles a
//! [`TestModule`] with up to three test cases:
//! - `<Fn> generates valid FunctionManifest`
//! - `<Fn> can be used as a Slack function in a workflow step`
//! - `All outputs of Slack function <Fn> should exist` (only with outputs)
//!
//! The assertion import is derived from the assertions the tests use, so
//! `assertExists` is imported exactly when the output test is present.
//! Type bindings are imported only when a parameter type refers to them.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use slack_schema_types::TypeModule;

use crate::TestGenError;
use crate::audit::GenerationEvent;
use crate::audit::GenerationEventParams;
use crate::audit::GenerationOutcome;
use crate::audit::GenerationSink;
use crate::audit::NoopGenerationSink;
use crate::config::DEFAULT_TEST_RUNNER;
use crate::config::ImportPaths;
use crate::ir::ImportDecl;
use crate::ir::Statement;
use crate::ir::TestCase;
use crate::ir::TestModule;
use crate::manifest::literal;
use crate::manifest::manifest_literal;
use crate::placeholder::PlaceholderPolicy;
use crate::record::FunctionRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// First line of every generated file.
pub const AUTOGENERATED_HEADER: &str = "/** This file was autogenerated. Follow the steps in \
                                        src/schema/slack/functions/_scripts/README.md to \
                                        rebuild **/";

/// Workflow binding used by the step tests.
const WORKFLOW_BINDING: &str = "testWorkflow";

// ============================================================================
// SECTION: Options
// ============================================================================

/// Rendering options for generated tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Dotted test registration call.
    pub test_runner: String,
    /// Import specifiers.
    pub imports: ImportPaths,
    /// Required-input placeholder policy.
    pub placeholders: PlaceholderPolicy,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            test_runner: DEFAULT_TEST_RUNNER.to_string(),
            imports: ImportPaths::default(),
            placeholders: PlaceholderPolicy::default(),
        }
    }
}

/// Assertion helpers imported from the dev dependencies module.
///
/// # Invariants
/// - Ordering matches the order names appear in the import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum AssertionHelper {
    /// `assertEquals`.
    Equals,
    /// `assertExists`.
    Exists,
}

impl AssertionHelper {
    /// Returns the imported name.
    const fn name(self) -> &'static str {
        match self {
            Self::Equals => "assertEquals",
            Self::Exists => "assertExists",
        }
    }

    /// Returns the helper a statement calls, if any.
    const fn used_by(statement: &Statement) -> Option<Self> {
        match statement {
            Statement::AssertEquals {
                ..
            } => Some(Self::Equals),
            Statement::AssertExists(_) => Some(Self::Exists),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Test source generator.
#[derive(Clone)]
pub struct TestGenerator {
    /// Rendering options.
    options: GeneratorOptions,
    /// Audit sink for render events.
    sink: Arc<dyn GenerationSink>,
}

impl fmt::Debug for TestGenerator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("TestGenerator").field("options", &self.options).finish_non_exhaustive()
    }
}

impl Default for TestGenerator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default())
    }
}

impl TestGenerator {
    /// Creates a generator that records no audit events.
    #[must_use]
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options,
            sink: Arc::new(NoopGenerationSink),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn GenerationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the rendering options.
    #[must_use]
    pub const fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Renders the test source for `record` and records an audit event.
    ///
    /// # Errors
    /// Returns [`TestGenError::MalformedRecord`] when the record fails
    /// validation, or [`TestGenError::Json`] when a literal cannot be encoded.
    pub fn generate(&self, record: &FunctionRecord) -> Result<String, TestGenError> {
        let result = self.build(record).map(|module| (module.test_count(), module.render()));
        let params = match &result {
            Ok((test_count, source)) => GenerationEventParams {
                callback_id: record.callback_id.clone(),
                outcome: GenerationOutcome::Rendered,
                test_count: *test_count,
                output_bytes: source.len(),
                error_kind: None,
            },
            Err(err) => GenerationEventParams {
                callback_id: record.callback_id.clone(),
                outcome: GenerationOutcome::Failed,
                test_count: 0,
                output_bytes: 0,
                error_kind: Some(err.kind()),
            },
        };
        self.sink.record(&GenerationEvent::new(params));
        result.map(|(_, source)| source)
    }

    /// Builds the test module for `record` without rendering it.
    ///
    /// # Errors
    /// Returns [`TestGenError::MalformedRecord`] when the record fails
    /// validation or its function name collides with an imported binding.
    pub fn build(&self, record: &FunctionRecord) -> Result<TestModule, TestGenError> {
        record.validate()?;
        let function_name = record.function_name();
        let required_inputs = self.required_inputs_literal(record)?;

        let mut tests = vec![
            manifest_test(record, &function_name)?,
            workflow_step_test(record, &function_name, &required_inputs)?,
        ];
        if !record.output_parameters.is_empty() {
            tests.push(output_existence_test(record, &function_name, &required_inputs)?);
        }

        let imports = self.imports(record, &function_name, &tests)?;
        Ok(TestModule {
            header: AUTOGENERATED_HEADER.to_string(),
            runner: self.options.test_runner.clone(),
            imports,
            tests,
        })
    }

    /// Renders `{<name>: <value>,\n...}` for the required inputs.
    fn required_inputs_literal(&self, record: &FunctionRecord) -> Result<String, TestGenError> {
        let mut entries = Vec::new();
        for parameter in record.required_inputs() {
            let value = self.options.placeholders.render(parameter)?;
            entries.push(format!("{}: {value}", parameter.name));
        }
        Ok(format!("{{{}}}", entries.join(",\n")))
    }

    /// Assembles the ordered import declarations.
    fn imports(
        &self,
        record: &FunctionRecord,
        function_name: &str,
        tests: &[TestCase],
    ) -> Result<Vec<ImportDecl>, TestGenError> {
        let paths = &self.options.imports;
        let helpers: BTreeSet<AssertionHelper> = tests
            .iter()
            .flat_map(|test| test.body.iter())
            .filter_map(AssertionHelper::used_by)
            .collect();

        let mut imports = vec![
            ImportDecl::named(helpers.iter().map(|helper| helper.name()), &paths.dev_deps),
            ImportDecl::named(["DefineWorkflow"], &paths.workflows),
            ImportDecl::named(["ManifestFunctionSchema"], &paths.manifest_schema),
        ];
        for module in type_modules(record) {
            let decl = match module {
                TypeModule::SchemaTypes => {
                    ImportDecl::default_binding(module.binding(), &paths.schema_types)
                }
                TypeModule::SlackTypes => {
                    ImportDecl::default_binding(module.binding(), &paths.slack_types)
                }
                TypeModule::InternalSlackTypes => {
                    ImportDecl::named([module.binding()], &paths.custom_types)
                }
            };
            imports.push(decl);
        }

        if imports.iter().any(|decl| decl.binds(function_name)) {
            return Err(TestGenError::MalformedRecord(format!(
                "function name '{function_name}' collides with an imported binding"
            )));
        }
        if self.options.test_runner.split('.').next() == Some(function_name) {
            return Err(TestGenError::MalformedRecord(format!(
                "function name '{function_name}' shadows the test runner '{}'",
                self.options.test_runner
            )));
        }
        imports.push(ImportDecl::default_binding(function_name, record.definition_import_path()));
        Ok(imports)
    }
}

// ============================================================================
// SECTION: Test Cases
// ============================================================================

/// Returns the type bindings referenced by any parameter of `record`.
fn type_modules(record: &FunctionRecord) -> BTreeSet<TypeModule> {
    record
        .input_parameters
        .iter()
        .chain(&record.output_parameters)
        .flat_map(|parameter| [Some(parameter.type_ref()), parameter.items_type_ref()])
        .flatten()
        .filter_map(|type_ref| type_ref.module())
        .collect()
}

/// Builds the manifest-shape test.
fn manifest_test(record: &FunctionRecord, function_name: &str) -> Result<TestCase, TestGenError> {
    Ok(TestCase {
        title: format!("{function_name} generates valid FunctionManifest"),
        body: vec![
            Statement::assert_equals(
                format!("{function_name}.definition.callback_id"),
                literal(&record.slack_callback_id())?,
            ),
            Statement::Const {
                name: "expected".to_string(),
                annotation: Some("ManifestFunctionSchema".to_string()),
                value: manifest_literal(record)?,
            },
            Statement::constant("actual", format!("{function_name}.export()")),
            Statement::Blank,
            Statement::assert_equals("actual", "expected"),
        ],
    })
}

/// Builds the workflow-step test.
fn workflow_step_test(
    record: &FunctionRecord,
    function_name: &str,
    required_inputs: &str,
) -> Result<TestCase, TestGenError> {
    Ok(TestCase {
        title: format!("{function_name} can be used as a Slack function in a workflow step"),
        body: vec![
            Statement::constant(WORKFLOW_BINDING, define_workflow(function_name)?),
            Statement::Expression(format!(
                "{WORKFLOW_BINDING}.addStep({function_name}, {required_inputs})"
            )),
            Statement::constant("actual", format!("{WORKFLOW_BINDING}.steps[0].export()")),
            Statement::Blank,
            Statement::assert_equals("actual.function_id", literal(&record.slack_callback_id())?),
            Statement::assert_equals("actual.inputs", required_inputs),
        ],
    })
}

/// Builds the output-existence test.
fn output_existence_test(
    record: &FunctionRecord,
    function_name: &str,
    required_inputs: &str,
) -> Result<TestCase, TestGenError> {
    let mut body = vec![
        Statement::constant(WORKFLOW_BINDING, define_workflow(function_name)?),
        Statement::constant(
            "step",
            format!("{WORKFLOW_BINDING}.addStep({function_name}, {required_inputs})"),
        ),
    ];
    body.extend(
        record
            .output_parameters
            .iter()
            .map(|parameter| Statement::AssertExists(format!("step.outputs.{}", parameter.name))),
    );
    Ok(TestCase {
        title: format!("All outputs of Slack function {function_name} should exist"),
        body,
    })
}

/// Renders the `DefineWorkflow({...})` call for a throwaway test workflow.
fn define_workflow(function_name: &str) -> Result<String, TestGenError> {
    let fields = [
        format!("callback_id: {}", literal(&format!("test_{function_name}_slack_function"))?),
        format!("title: {}", literal(&format!("Test {function_name}"))?),
        format!(
            "description: {}",
            literal(&format!("This is a generated test to test {function_name}"))?
        ),
    ];
    Ok(format!("DefineWorkflow({{{}}})", fields.join(", \n")))
}
