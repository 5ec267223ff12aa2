//! Rule engine implementation
//!
//! The engine owns traversal: it walks each tree once in preorder and hands
//! every node to the rules subscribed to that node's kind. Rules never walk
//! the tree themselves.

use parline_core::cst::{CsSyntaxKind, CsSyntaxNode, TextRange};
use parline_core::{
    CodeSuggestion, DefaultDiagnosticCollector, Diagnostic, DiagnosticCollector, ParlineConfig,
    RuleMetadata, Severity, SourceModel,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::fixer::{CodeAction, FixOptions};

/// A rule that inspects individual syntax nodes
///
/// Implementations are stateless and shared across worker threads.
pub trait SyntaxRule: Send + Sync {
    /// Immutable metadata describing the rule
    fn metadata(&self) -> &'static RuleMetadata;

    /// Node kinds this rule wants to see
    fn subscribed_kinds(&self) -> &'static [CsSyntaxKind];

    /// Inspect one node and report problems into `sink`
    fn check_node(
        &self,
        node: &CsSyntaxNode,
        ctx: &RuleContext<'_>,
        sink: &mut dyn DiagnosticCollector,
    );

    /// Produce a new tree with the problem at `trigger` fixed
    ///
    /// `None` means the rule has nothing to change.
    fn fix(
        &self,
        _root: &CsSyntaxNode,
        _trigger: &CsSyntaxNode,
        _options: &FixOptions,
    ) -> Option<CsSyntaxNode> {
        None
    }
}

/// Per-file data handed to rules while checking
pub struct RuleContext<'a> {
    pub model: &'a SourceModel,
    /// Effective severity of the rule being dispatched
    pub severity: Severity,
}

impl RuleContext<'_> {
    /// Diagnostic for `range` carrying the rule's message and fix action
    pub fn diagnostic(&self, metadata: &RuleMetadata, range: TextRange) -> Diagnostic {
        let location = self.model.source_map.range_to_location(
            range,
            &self.model.source,
            &self.model.source_file,
        );

        let mut diagnostic = Diagnostic::new(
            metadata.id,
            self.severity,
            metadata.message,
            location.clone(),
        )
        .with_category(metadata.category);

        if let Some(action) = CodeAction::for_rule(metadata) {
            let mut suggestion = CodeSuggestion::safe(action.title, location);
            if let Some(key) = action.equivalence_key {
                suggestion = suggestion.with_equivalence_key(key);
            }
            diagnostic = diagnostic.with_suggestion(suggestion);
        }

        diagnostic
    }
}

/// Cooperative cancellation signal shared between a caller and the engine
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Registered rules plus the configuration that governs them
pub struct RuleEngine {
    rules: Vec<Box<dyn SyntaxRule>>,
    config: ParlineConfig,
}

impl RuleEngine {
    /// Create an engine without any rules
    pub fn new(config: ParlineConfig) -> Self {
        Self {
            rules: Vec::new(),
            config,
        }
    }

    /// Create an engine with every built-in rule registered
    pub fn with_builtin_rules(config: ParlineConfig) -> Self {
        let mut engine = Self::new(config);
        for rule in crate::builtin::builtin_rules() {
            engine.register(rule);
        }
        engine
    }

    /// Register a rule; a second rule with an existing id is ignored
    pub fn register(&mut self, rule: Box<dyn SyntaxRule>) {
        let id = rule.metadata().id;
        if self.rule(id).is_some() {
            tracing::warn!("Rule '{}' already registered, keeping existing", id);
            return;
        }
        self.rules.push(rule);
    }

    pub fn rule(&self, id: &str) -> Option<&dyn SyntaxRule> {
        self.rules
            .iter()
            .find(|rule| rule.metadata().id == id)
            .map(|rule| rule.as_ref())
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn SyntaxRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn config(&self) -> &ParlineConfig {
        &self.config
    }

    /// Severity a rule reports with, or `None` when it is turned off
    pub fn effective_severity(&self, metadata: &RuleMetadata) -> Option<Severity> {
        match self.config.rule_severity(metadata.id) {
            Some(configured) => configured.to_severity(),
            None => Some(metadata.severity),
        }
    }

    /// Lint one parsed file
    ///
    /// Lexer problems are reported first, then every node is dispatched in
    /// preorder to the rules subscribed to its kind. Cancellation is checked
    /// between nodes; a cancelled run returns what was collected so far.
    pub fn lint(&self, model: &SourceModel, cancel: &CancellationFlag) -> Vec<Diagnostic> {
        let mut collector = DefaultDiagnosticCollector::new();

        if !self.config.linter_enabled() {
            tracing::debug!("Linter disabled, skipping {}", model.path().display());
            return collector.into_diagnostics();
        }

        collector.collect_all(model.syntax_diagnostics());

        let mut subscriptions: HashMap<CsSyntaxKind, Vec<(&dyn SyntaxRule, Severity)>> =
            HashMap::new();
        for rule in self.rules() {
            let Some(severity) = self.effective_severity(rule.metadata()) else {
                tracing::trace!("Rule '{}' is off", rule.metadata().id);
                continue;
            };
            for kind in rule.subscribed_kinds() {
                subscriptions.entry(*kind).or_default().push((rule, severity));
            }
        }

        for node in model.cst.descendants() {
            let Some(subscribers) = subscriptions.get(&node.kind()) else {
                continue;
            };
            if cancel.is_cancelled() {
                tracing::debug!("Lint of {} cancelled", model.path().display());
                break;
            }
            for (rule, severity) in subscribers {
                let ctx = RuleContext {
                    model,
                    severity: *severity,
                };
                rule.check_node(&node, &ctx, &mut collector);
            }
        }

        collector.sort_by_location();
        let diagnostics = collector.into_diagnostics();
        tracing::debug!(
            "{}: {} diagnostic(s)",
            model.path().display(),
            diagnostics.len()
        );
        diagnostics
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<_> = self.rules().map(|rule| rule.metadata().id).collect();
        f.debug_struct("RuleEngine")
            .field("rules", &ids)
            .field("config", &self.config)
            .finish()
    }
}
