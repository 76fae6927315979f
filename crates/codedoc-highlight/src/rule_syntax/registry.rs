use crate::rule_syntax::definition::SyntaxDefinition;
use crate::rule_syntax::error::{HighlightingError, ResolutionWarning};
use crate::rule_syntax::grammar::{
    DefinitionId, HighlightDefinition, HighlightRuleSet, RuleSetId, Span, SpanId,
};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
/// An owned collection of highlighting definitions.
///
/// Load every definition, call [`resolve`](Self::resolve) once, then share the registry
/// behind an `Arc` with the highlighters of any number of documents.
pub struct HighlightingRegistry {
    definitions: Vec<HighlightDefinition>,
    by_name: HashMap<String, DefinitionId>,
    warnings: Vec<ResolutionWarning>,
    resolved: bool,
}

impl HighlightingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a compiled definition.
    pub fn add(&mut self, definition: HighlightDefinition) -> Result<DefinitionId, HighlightingError> {
        if definition.rule_sets.is_empty() {
            return Err(HighlightingError::MissingField("rule_sets"));
        }
        let empty_begin = definition
            .rule_sets
            .iter()
            .flat_map(|rule_set| &rule_set.spans)
            .any(|span| span.begin.is_empty());
        if empty_begin {
            return Err(HighlightingError::MissingField("spans.begin"));
        }
        if self.by_name.contains_key(&definition.name) {
            return Err(HighlightingError::DuplicateDefinition(definition.name));
        }
        let id = DefinitionId(self.definitions.len());
        self.by_name.insert(definition.name.clone(), id);
        self.definitions.push(definition);
        self.resolved = false;
        Ok(id)
    }

    /// Parse and register a YAML definition.
    pub fn load_from_str(&mut self, yaml: &str) -> Result<DefinitionId, HighlightingError> {
        let definition: SyntaxDefinition = serde_yaml::from_str(yaml)?;
        self.add(HighlightDefinition::compile(definition)?)
    }

    /// Read, parse and register a YAML definition file.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<DefinitionId, HighlightingError> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        self.load_from_str(&yaml)
    }

    /// Definition named `name`.
    pub fn find_by_name(&self, name: &str) -> Option<DefinitionId> {
        self.by_name.get(name).copied()
    }

    /// First definition whose extensions match `file_name`.
    pub fn find_for_file(&self, file_name: &str) -> Option<DefinitionId> {
        self.definitions
            .iter()
            .position(|definition| definition.handles_file(file_name))
            .map(DefinitionId)
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// The definition behind `id`.
    pub fn definition(&self, id: DefinitionId) -> &HighlightDefinition {
        &self.definitions[id.0]
    }

    /// The rule set behind `id`.
    pub fn rule_set(&self, id: RuleSetId) -> &HighlightRuleSet {
        &self.definitions[id.definition.0].rule_sets[id.index]
    }

    /// The span behind `id`.
    pub fn span(&self, id: SpanId) -> &Span {
        &self.rule_set(id.rule_set).spans[id.index]
    }

    /// Main rule set of `definition`.
    pub fn main_rule_set(&self, definition: DefinitionId) -> RuleSetId {
        RuleSetId {
            definition,
            index: self.definition(definition).main_rule_set().unwrap_or(0),
        }
    }

    /// Rule set of `definition` named `name`.
    pub fn find_rule_set(
        &self,
        definition: DefinitionId,
        name: &str,
    ) -> Result<RuleSetId, HighlightingError> {
        let owner = self.definition(definition);
        owner
            .rule_set_index(name)
            .map(|index| RuleSetId { definition, index })
            .ok_or_else(|| HighlightingError::UnknownRuleSet {
                definition: owner.name.clone(),
                rule_set: name.to_string(),
            })
    }

    /// The rule set that highlights in place of `id` once references are followed.
    pub fn effective_rule_set(&self, id: RuleSetId) -> RuleSetId {
        self.rule_set(id).effective.unwrap_or(id)
    }

    /// Whether [`resolve`](Self::resolve) ran since the last [`add`](Self::add).
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Problems found by the last [`resolve`](Self::resolve).
    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    /// Turn every `reference` and span `rule` name into indices.
    ///
    /// Unknown names and reference cycles are reported as warnings (and logged); the affected
    /// rule set or span falls back to its own rule set.
    pub fn resolve(&mut self) -> &[ResolutionWarning] {
        let mut warnings = Vec::new();

        let mut effective = Vec::with_capacity(self.definitions.len());
        for (definition, owner) in self.definitions.iter().enumerate() {
            let per_definition: Vec<RuleSetId> = (0..owner.rule_sets.len())
                .map(|index| {
                    self.follow_references(
                        RuleSetId {
                            definition: DefinitionId(definition),
                            index,
                        },
                        &mut warnings,
                    )
                })
                .collect();
            effective.push(per_definition);
        }

        let mut span_targets = Vec::with_capacity(self.definitions.len());
        for (definition, owner) in self.definitions.iter().enumerate() {
            let mut per_definition = Vec::with_capacity(owner.rule_sets.len());
            for (index, rule_set) in owner.rule_sets.iter().enumerate() {
                let targets: Vec<Option<RuleSetId>> = rule_set
                    .spans
                    .iter()
                    .map(|span| {
                        let rule = span.rule.as_deref()?;
                        let target = match owner.rule_set_index(rule) {
                            Some(target) => target,
                            None => {
                                warnings.push(ResolutionWarning::UnknownSpanRule {
                                    definition: owner.name.clone(),
                                    span: span.name.clone(),
                                    rule: rule.to_string(),
                                });
                                index
                            }
                        };
                        Some(effective[definition][target])
                    })
                    .collect();
                per_definition.push(targets);
            }
            span_targets.push(per_definition);
        }

        for (definition, owner) in self.definitions.iter_mut().enumerate() {
            for (index, rule_set) in owner.rule_sets.iter_mut().enumerate() {
                rule_set.effective = Some(effective[definition][index]);
                for (span, target) in rule_set
                    .spans
                    .iter_mut()
                    .zip(span_targets[definition][index].iter())
                {
                    span.resolved_rule_set = *target;
                }
            }
        }

        for warning in &warnings {
            log::warn!("highlighting definition: {warning}");
        }
        self.warnings = warnings;
        self.resolved = true;
        &self.warnings
    }

    fn follow_references(
        &self,
        start: RuleSetId,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> RuleSetId {
        let mut visited = vec![start];
        let mut current = start;
        loop {
            let rule_set = self.rule_set(current);
            let Some(reference) = rule_set.reference.as_deref() else {
                return current;
            };
            let Some(target) = self.find_by_name(reference) else {
                if current == start {
                    warnings.push(ResolutionWarning::UnknownReference {
                        definition: self.definition(start.definition).name.clone(),
                        rule_set: rule_set.name.clone(),
                        reference: reference.to_string(),
                    });
                }
                return current;
            };
            let next = self.main_rule_set(target);
            if visited.contains(&next) {
                warnings.push(ResolutionWarning::ReferenceCycle {
                    definition: self.definition(start.definition).name.clone(),
                    rule_set: self.rule_set(start).name.clone(),
                });
                return start;
            }
            visited.push(next);
            current = next;
        }
    }
}
