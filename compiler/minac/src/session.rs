//! Analysis sessions.

use std::sync::Arc;

use mina_diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics};
use mina_ir::{module_path, CancellationToken, Cancelled, CompilationUnit, StringInterner};
use mina_patterns::{check_matches, MatchContext};
use mina_resolve::{resolve_unit, ResolveContext, Resolutions};
use mina_symbols::{
    declare_unit, lower_unit, register_unit, DeclId, DeclKind, ModuleId, Namespace, SavedModule,
    SymbolTable, SymbolTableHandle, UnitSymbols,
};
use mina_typeck::{check_unit, CheckContext, TypeTable};
use mina_types::{TypeId, TypeInterner, TypeScheme};
use rayon::prelude::*;

use crate::graph::DependencyGraph;
use crate::{AnalysisConfig, AnalysisError, DocumentId, DocumentTracker};

/// Stack size of batch worker threads. Type inference and match analysis
/// recurse over the tree; `stacker` grows the stack on demand, a larger
/// initial stack keeps that rare.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Everything produced for one compilation unit.
#[derive(Debug)]
pub struct AnalysisResult {
    pub module: ModuleId,
    pub resolutions: Resolutions,
    pub types: TypeTable,
    /// Ordered by source position.
    pub diagnostics: Diagnostics,
}

/// A unit whose declarations are in the table, waiting for its passes.
#[derive(Debug)]
struct Declared {
    symbols: UnitSymbols,
    sink: DiagnosticSink,
}

#[derive(Debug)]
struct Analyzed {
    result: AnalysisResult,
    schemes: Vec<(DeclId, TypeScheme)>,
}

/// Shared state of one analysis session.
///
/// All units analysed by a session see the same symbol table, so a unit can
/// import modules analysed earlier in the session.
#[derive(Debug)]
pub struct Session {
    interner: Arc<StringInterner>,
    types: Arc<TypeInterner>,
    table: SymbolTableHandle,
    config: AnalysisConfig,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(AnalysisConfig::default())
    }
}

impl Session {
    pub fn new(config: AnalysisConfig) -> Self {
        Session::with_interner(Arc::new(StringInterner::new()), config)
    }

    /// Session over an interner shared with the producer of the trees.
    pub fn with_interner(interner: Arc<StringInterner>, config: AnalysisConfig) -> Self {
        let table = SymbolTable::new(&interner);
        Session {
            interner,
            types: Arc::new(TypeInterner::new()),
            table: SymbolTableHandle::new(table),
            config,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn shared_interner(&self) -> Arc<StringInterner> {
        Arc::clone(&self.interner)
    }

    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Current view of the symbol table.
    pub fn symbols(&self) -> Arc<SymbolTable> {
        self.table.snapshot()
    }

    /// Published scheme of the value `name` in the dotted module `module`.
    pub fn value_scheme(&self, module: &str, name: &str) -> Option<TypeScheme> {
        let table = self.table.snapshot();
        let module = table.module_id(&module_path(&self.interner, module))?;
        let decl = table
            .module(module)
            .get(Namespace::Value, self.interner.intern(name))?;
        match &table.decl(decl).kind {
            DeclKind::Value { scheme } => *scheme,
            _ => None,
        }
    }

    pub fn display_type(&self, ty: TypeId) -> String {
        self.types.display(ty, &self.interner).to_string()
    }

    /// Analyse one unit and publish its inferred schemes.
    ///
    /// Modules it imports must have been analysed by this session already.
    /// If the run is cancelled, the unit's module is left as it was before.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(module = %self.interner.join(unit.module.segments()))
    )]
    pub fn analyze_unit(
        &self,
        unit: &CompilationUnit,
        token: &CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let (saved, declared) = self.table.update(|table| {
            let saved = table.save_module(&unit.module);
            let mut sink = DiagnosticSink::new();
            let symbols = declare_unit(table, unit, &self.interner, &self.types, &mut sink);
            (saved, Declared { symbols, sink })
        });
        let table = self.table.snapshot();
        let analyzed = match self.run_passes(&table, unit, declared, token) {
            Ok(analyzed) => analyzed,
            Err(cancelled) => {
                self.roll_back(vec![saved]);
                return Err(cancelled.into());
            }
        };
        self.publish(analyzed.schemes);
        Ok(analyzed.result)
    }

    /// Analyse a batch of units, dependencies first.
    ///
    /// Results are returned in the order of `units`. Units on an import
    /// cycle get an [`ImportCycle`](DiagnosticKind::ImportCycle) diagnostic
    /// and are analysed after everything else. A cancelled batch leaves every
    /// module of the batch as it was before.
    #[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
    pub fn analyze_units(
        &self,
        units: &[CompilationUnit],
        token: &CancellationToken,
    ) -> Result<Vec<AnalysisResult>, AnalysisError> {
        let (saved, mut declared) = self.table.update(|table| {
            let saved: Vec<SavedModule> =
                units.iter().map(|unit| table.save_module(&unit.module)).collect();
            (saved, self.declare_batch(table, units))
        });

        let graph = DependencyGraph::build(units);
        let levels = graph.levels();
        let mut schedule = levels.ordered;
        if !levels.cyclic.is_empty() {
            self.report_cycles(units, &graph, &levels.cyclic, &mut declared);
            schedule.push(levels.cyclic);
        }
        tracing::debug!(levels = schedule.len(), "scheduled units");

        let mut done = match self.run_schedule(units, &schedule, &mut declared, token) {
            Ok(done) => done,
            Err(cancelled) => {
                self.roll_back(saved);
                return Err(cancelled.into());
            }
        };
        done.sort_unstable_by_key(|(index, _)| *index);
        Ok(done.into_iter().map(|(_, result)| result).collect())
    }

    /// Analyse `version` of an editor document.
    ///
    /// Starting the run cancels analysis of any older version. A result is
    /// only returned if `version` is still the latest once the run ends.
    pub fn analyze_document(
        &self,
        tracker: &DocumentTracker,
        document: DocumentId,
        version: i32,
        unit: &CompilationUnit,
    ) -> Result<AnalysisResult, AnalysisError> {
        let token = tracker.begin(document, version)?;
        let outcome = self.analyze_unit(unit, &token);
        tracker.ensure_current(document, version)?;
        outcome
    }

    /// Register every unit before lowering any, so imports between units
    /// of the batch resolve regardless of order.
    fn declare_batch(
        &self,
        table: &mut SymbolTable,
        units: &[CompilationUnit],
    ) -> Vec<Option<Declared>> {
        let registered: Vec<_> = units
            .iter()
            .map(|unit| {
                let mut sink = DiagnosticSink::new();
                let registered = register_unit(table, unit, &self.interner, &self.types, &mut sink);
                (registered, sink)
            })
            .collect();
        units
            .iter()
            .zip(registered)
            .map(|(unit, (registered, mut sink))| {
                let symbols =
                    lower_unit(table, unit, &registered, &self.interner, &self.types, &mut sink);
                Some(Declared { symbols, sink })
            })
            .collect()
    }

    fn run_schedule(
        &self,
        units: &[CompilationUnit],
        schedule: &[Vec<usize>],
        declared: &mut [Option<Declared>],
        token: &CancellationToken,
    ) -> Result<Vec<(usize, AnalysisResult)>, Cancelled> {
        if !self.config.parallel || schedule.iter().all(|level| level.len() < 2) {
            return self.run_levels(units, schedule, declared, token, false);
        }

        // A scoped pool is torn down before returning.
        let pooled = rayon::ThreadPoolBuilder::new()
            .stack_size(WORKER_STACK_SIZE)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| self.run_levels(units, schedule, declared, token, true))
            });
        pooled.unwrap_or_else(|err| {
            tracing::warn!("failed to create thread pool ({err}), analysing sequentially");
            self.run_levels(units, schedule, declared, token, false)
        })
    }

    fn run_levels(
        &self,
        units: &[CompilationUnit],
        schedule: &[Vec<usize>],
        declared: &mut [Option<Declared>],
        token: &CancellationToken,
        parallel: bool,
    ) -> Result<Vec<(usize, AnalysisResult)>, Cancelled> {
        let mut done = Vec::with_capacity(units.len());
        for level in schedule {
            token.check().inspect_err(|_| tracing::warn!("batch analysis cancelled"))?;
            let table = self.table.snapshot();
            let jobs: Vec<(usize, Declared)> = level
                .iter()
                .filter_map(|&index| declared[index].take().map(|job| (index, job)))
                .collect();

            let analyze = |(index, job): (usize, Declared)| {
                self.run_passes(&table, &units[index], job, token)
                    .map(|analyzed| (index, analyzed))
            };
            let analyzed: Vec<(usize, Analyzed)> = if parallel && jobs.len() > 1 {
                jobs.into_par_iter().map(analyze).collect::<Result<_, _>>()?
            } else {
                jobs.into_iter().map(analyze).collect::<Result<_, _>>()?
            };

            self.publish(
                analyzed
                    .iter()
                    .flat_map(|(_, unit)| unit.schemes.iter().copied()),
            );
            done.extend(analyzed.into_iter().map(|(index, unit)| (index, unit.result)));
        }
        Ok(done)
    }

    /// Resolve, infer and check matches of one declared unit against a
    /// fixed table snapshot.
    fn run_passes(
        &self,
        table: &SymbolTable,
        unit: &CompilationUnit,
        declared: Declared,
        token: &CancellationToken,
    ) -> Result<Analyzed, Cancelled> {
        let Declared { symbols, mut sink } = declared;
        let interner: &StringInterner = &self.interner;
        let types: &TypeInterner = &self.types;

        let run = |sink: &mut DiagnosticSink| -> Result<_, Cancelled> {
            let resolutions = resolve_unit(
                &ResolveContext {
                    table,
                    unit,
                    symbols: &symbols,
                    interner,
                },
                sink,
                token,
            )?;
            token.check()?;
            let checked = check_unit(
                &CheckContext {
                    table,
                    unit,
                    symbols: &symbols,
                    resolutions: &resolutions,
                    interner,
                    types,
                },
                sink,
                token,
            )?;
            token.check()?;
            check_matches(
                &MatchContext {
                    table,
                    unit,
                    resolutions: &resolutions,
                    type_table: &checked.types,
                    types,
                    interner,
                },
                &self.config.match_config(),
                sink,
                token,
            )?;
            Ok((resolutions, checked))
        };

        let (resolutions, checked) = run(&mut sink).inspect_err(|_| {
            tracing::warn!(module = %interner.join(unit.module.segments()), "analysis cancelled");
        })?;
        let diagnostics = sink.finish();
        tracing::debug!(
            module = %interner.join(unit.module.segments()),
            diagnostics = diagnostics.len(),
            internal = diagnostics.internal().len(),
            "analysed unit"
        );
        Ok(Analyzed {
            result: AnalysisResult {
                module: symbols.module,
                resolutions,
                types: checked.types,
                diagnostics,
            },
            schemes: checked.schemes,
        })
    }

    /// Make inferred schemes visible to units analysed later.
    fn publish(&self, schemes: impl IntoIterator<Item = (DeclId, TypeScheme)>) {
        let schemes: Vec<_> = schemes.into_iter().collect();
        if schemes.is_empty() {
            return;
        }
        self.table.update(|table| {
            for (decl, scheme) in schemes {
                table.set_value_scheme(decl, scheme);
            }
        });
    }

    /// Undo the declarations of an unfinished run, last saved first.
    fn roll_back(&self, saved: Vec<SavedModule>) {
        tracing::debug!(modules = saved.len(), "restoring modules of a cancelled run");
        self.table.update(|table| {
            for module in saved.into_iter().rev() {
                table.restore_module(module);
            }
        });
    }

    fn report_cycles(
        &self,
        units: &[CompilationUnit],
        graph: &DependencyGraph,
        cyclic: &[usize],
        declared: &mut [Option<Declared>],
    ) {
        for (from, dep) in graph.cycle_edges(cyclic) {
            let Some(job) = declared[from].as_mut() else {
                continue;
            };
            let source = self.interner.join(units[from].module.segments());
            let target = self.interner.join(units[dep.target].module.segments());
            tracing::debug!(%source, %target, "import cycle");
            job.sink.push(
                Diagnostic::error(DiagnosticKind::ImportCycle)
                    .with_message(format!(
                        "module `{source}` depends on `{target}`, which depends back on `{source}`"
                    ))
                    .with_label(dep.span, "this dependency closes a cycle")
                    .with_note(
                        "values used across the cycle are typed without each other's \
                         inferred types; annotate them",
                    ),
            );
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
