//! Script specifier extraction using OXC

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_parser::{ParseOptions, Parser};
use oxc_span::SourceType;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

use super::{fallback, Extraction, SpecifierExtractor};
use crate::models::file_category::{FileCategory, ScriptDialect};

/// JSX attributes that name a local resource
const RESOURCE_ATTRIBUTES: &[&str] = &["src", "href", "poster"];

/// Thread-safe allocator pool for reuse across parses
pub struct AllocatorPool {
    allocators: Arc<Mutex<Vec<Allocator>>>,
}

impl AllocatorPool {
    /// Create a new allocator pool
    pub fn new(size: usize) -> Self {
        let allocators = (0..size).map(|_| Allocator::default()).collect();
        Self {
            allocators: Arc::new(Mutex::new(allocators)),
        }
    }

    /// Take an allocator from the pool
    pub fn take(&self) -> Option<Allocator> {
        self.allocators.lock().pop()
    }

    /// Reset an allocator and return it to the pool
    pub fn return_allocator(&self, mut allocator: Allocator) {
        allocator.reset();
        self.allocators.lock().push(allocator);
    }

    pub fn available(&self) -> usize {
        self.allocators.lock().len()
    }
}

/// Extracts specifiers from JavaScript and TypeScript sources
pub struct ScriptExtractor {
    parse_options: ParseOptions,
    allocator_pool: AllocatorPool,
}

impl ScriptExtractor {
    pub fn new() -> Self {
        Self {
            parse_options: ParseOptions {
                parse_regular_expression: false,
                ..ParseOptions::default()
            },
            allocator_pool: AllocatorPool::new(num_cpus::get()),
        }
    }

    /// Parse `text` as `dialect` and collect its specifiers.
    ///
    /// If the parser reports errors, whatever it recovered is still visited
    /// and the pattern scanner fills in what the AST may have lost.
    pub fn extract_dialect(&self, dialect: ScriptDialect, text: &str) -> Extraction {
        let allocator = self.allocator_pool.take().unwrap_or_default();

        let (specifiers, errors, panicked) = {
            let ret = Parser::new(&allocator, text, source_type_for(dialect))
                .with_options(self.parse_options.clone())
                .parse();

            let mut collector = SpecifierCollector::default();
            collector.visit_program(&ret.program);

            let errors: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
            (collector.specifiers, errors, ret.panicked)
        };

        self.allocator_pool.return_allocator(allocator);

        let mut extraction = Extraction::new();
        for specifier in &specifiers {
            extraction.push(specifier);
        }

        if panicked || !errors.is_empty() {
            trace!(errors = errors.len(), panicked, "script parse incomplete, scanning with patterns");
            for specifier in fallback::scan(text) {
                extraction.push(specifier);
            }
            let first = errors.first().cloned().unwrap_or_else(|| "parser aborted".to_string());
            extraction.push_diagnostic(format!("{} parse error(s); first: {}", errors.len().max(1), first));
        }

        extraction
    }
}

impl Default for ScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecifierExtractor for ScriptExtractor {
    fn name(&self) -> &'static str {
        "script"
    }

    fn handles(&self, category: FileCategory) -> bool {
        matches!(category, FileCategory::Script(_))
    }

    fn extract(&self, category: FileCategory, text: &str) -> Extraction {
        let dialect = match category {
            FileCategory::Script(dialect) => dialect,
            _ => ScriptDialect::Js,
        };
        self.extract_dialect(dialect, text)
    }
}

/// Plain `.js` is parsed with JSX enabled since React projects commonly use it
fn source_type_for(dialect: ScriptDialect) -> SourceType {
    match dialect {
        ScriptDialect::Js | ScriptDialect::Jsx => SourceType::jsx(),
        ScriptDialect::Ts => SourceType::ts(),
        ScriptDialect::Tsx => SourceType::tsx(),
    }
}

/// AST visitor collecting every literal module reference
#[derive(Default)]
struct SpecifierCollector {
    specifiers: Vec<String>,
}

impl SpecifierCollector {
    fn push(&mut self, specifier: &str) {
        self.specifiers.push(specifier.to_string());
    }

    fn push_argument(&mut self, argument: Option<&Argument<'_>>) {
        if let Some(value) = argument.and_then(argument_literal) {
            self.specifiers.push(value);
        }
    }
}

/// A string literal or a template literal without substitutions
fn argument_literal(argument: &Argument<'_>) -> Option<String> {
    match argument {
        Argument::StringLiteral(lit) => Some(lit.value.to_string()),
        Argument::TemplateLiteral(template) => template_literal(template),
        _ => None,
    }
}

fn expression_literal(expression: &Expression<'_>) -> Option<String> {
    match expression {
        Expression::StringLiteral(lit) => Some(lit.value.to_string()),
        Expression::TemplateLiteral(template) => template_literal(template),
        _ => None,
    }
}

fn template_literal(template: &TemplateLiteral<'_>) -> Option<String> {
    if !template.expressions.is_empty() || template.quasis.len() != 1 {
        return None;
    }
    let quasi = &template.quasis[0];
    Some(quasi.value.cooked.as_ref().unwrap_or(&quasi.value.raw).to_string())
}

fn is_require_callee(callee: &Expression<'_>) -> bool {
    match callee {
        Expression::Identifier(ident) => ident.name.as_str() == "require",
        Expression::StaticMemberExpression(member) => {
            member.property.name.as_str() == "resolve"
                && matches!(&member.object, Expression::Identifier(ident) if ident.name.as_str() == "require")
        }
        _ => false,
    }
}

/// `import.meta.url`
fn is_import_meta_url(argument: &Argument<'_>) -> bool {
    match argument {
        Argument::StaticMemberExpression(member) => {
            member.property.name.as_str() == "url"
                && matches!(
                    &member.object,
                    Expression::MetaProperty(meta) if meta.meta.name.as_str() == "import" && meta.property.name.as_str() == "meta"
                )
        }
        _ => false,
    }
}

impl<'a> Visit<'a> for SpecifierCollector {
    fn visit_import_declaration(&mut self, decl: &ImportDeclaration<'a>) {
        self.push(decl.source.value.as_str());
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(source) = &decl.source {
            self.push(source.value.as_str());
        }
        walk::walk_export_named_declaration(self, decl);
    }

    fn visit_export_all_declaration(&mut self, decl: &ExportAllDeclaration<'a>) {
        self.push(decl.source.value.as_str());
    }

    fn visit_ts_import_equals_declaration(&mut self, decl: &TSImportEqualsDeclaration<'a>) {
        if let TSModuleReference::ExternalModuleReference(reference) = &decl.module_reference {
            self.push(reference.expression.value.as_str());
        }
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        if let Some(value) = expression_literal(&expr.source) {
            self.specifiers.push(value);
        }
        walk::walk_import_expression(self, expr);
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if is_require_callee(&call.callee) {
            self.push_argument(call.arguments.first());
        }
        walk::walk_call_expression(self, call);
    }

    fn visit_new_expression(&mut self, expr: &NewExpression<'a>) {
        let is_url = matches!(&expr.callee, Expression::Identifier(ident) if ident.name.as_str() == "URL");
        if is_url && expr.arguments.get(1).is_some_and(is_import_meta_url) {
            self.push_argument(expr.arguments.first());
        }
        walk::walk_new_expression(self, expr);
    }

    fn visit_jsx_attribute(&mut self, attr: &JSXAttribute<'a>) {
        let is_resource = match &attr.name {
            JSXAttributeName::Identifier(ident) => RESOURCE_ATTRIBUTES.contains(&ident.name.as_str()),
            JSXAttributeName::NamespacedName(_) => false,
        };

        if is_resource {
            match &attr.value {
                Some(JSXAttributeValue::StringLiteral(lit)) => self.push(lit.value.as_str()),
                Some(JSXAttributeValue::ExpressionContainer(container)) => {
                    if let JSXExpression::StringLiteral(lit) = &container.expression {
                        self.push(lit.value.as_str());
                    }
                }
                _ => {}
            }
        }
        walk::walk_jsx_attribute(self, attr);
    }
}
