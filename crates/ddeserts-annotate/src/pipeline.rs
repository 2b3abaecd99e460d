//! The annotation pipeline
//!
//! Stages run one after another, each over every record, in [`StageKind`]
//! order. Each stage's inputs are checked at entry, so a pipeline that skips
//! a prerequisite fails with `MissingColumn` instead of writing garbage.
//!
//! The free `add_*` functions run a single stage and validate the config
//! first, as [`AnnotationPipelineBuilder::build`] does.

use crate::context::AnnotationContext;
use crate::stage::{Stage, StageKind};
use crate::stages::{
    ConsolidateRaces, Disparities, DisparityScore, DvapCounts, DvapProportions, OtherRace,
    RaceShares,
};
use ddeserts_core::{CensusConfig, Error, Result, Table};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Ordered stages bound to one configuration
pub struct AnnotationPipeline<'a> {
    config: &'a CensusConfig,
    stages: Vec<Box<dyn Stage>>,
}

/// Assembles a pipeline, refusing stages out of order
pub struct AnnotationPipelineBuilder<'a> {
    config: &'a CensusConfig,
    stages: Vec<Box<dyn Stage>>,
}

impl<'a> AnnotationPipelineBuilder<'a> {
    /// Append a stage; it must come strictly after the last one added
    pub fn stage<S: Stage + 'static>(mut self, stage: S) -> Result<Self> {
        if let Some(last) = self.stages.last() {
            if stage.kind() <= last.kind() {
                return Err(Error::StageOrder {
                    stage: stage.kind().name(),
                    after: last.kind().name(),
                });
            }
        }
        self.stages.push(Box::new(stage));
        Ok(self)
    }

    /// Validate the configuration and finish
    pub fn build(self) -> Result<AnnotationPipeline<'a>> {
        self.config.validate()?;
        Ok(AnnotationPipeline {
            config: self.config,
            stages: self.stages,
        })
    }
}

impl<'a> AnnotationPipeline<'a> {
    pub fn builder(config: &'a CensusConfig) -> AnnotationPipelineBuilder<'a> {
        AnnotationPipelineBuilder {
            config,
            stages: Vec::new(),
        }
    }

    /// Every step, with the disparity score only if the config asks for it
    pub fn standard(config: &'a CensusConfig) -> Result<Self> {
        let builder = Self::builder(config)
            .stage(ConsolidateRaces)?
            .stage(OtherRace)?
            .stage(DvapCounts)?
            .stage(DvapProportions)?
            .stage(RaceShares)?
            .stage(Disparities)?;
        let builder = if config.disparity_score {
            builder.stage(DisparityScore)?
        } else {
            builder
        };
        builder.build()
    }

    pub fn config(&self) -> &CensusConfig {
        self.config
    }

    pub fn stages(&self) -> impl Iterator<Item = StageKind> + '_ {
        self.stages.iter().map(|s| s.kind())
    }

    /// Run every stage over the table, in order.
    ///
    /// On error the table keeps the columns of the stages that completed.
    #[instrument(skip_all, fields(records = table.len(), stages = self.stages.len()))]
    pub fn run(&self, table: &mut Table) -> Result<AnnotationContext> {
        let mut ctx = AnnotationContext::new();

        for stage in &self.stages {
            let kind = stage.kind();
            let before: HashSet<String> = table.columns().iter().cloned().collect();

            ctx.time_stage(kind, || run_stage(stage.as_ref(), table, self.config))?;

            let added: Vec<String> = table
                .columns()
                .iter()
                .filter(|c| !before.contains(*c))
                .cloned()
                .collect();
            debug!(stage = %kind, columns_added = added.len(), "stage complete");
            ctx.record_columns(added);
        }

        debug!(
            trace_id = %ctx.trace_id,
            columns_added = ctx.columns_added().len(),
            elapsed_us = ctx.elapsed().as_micros() as u64,
            "annotation complete"
        );
        Ok(ctx)
    }
}

fn run_stage(stage: &dyn Stage, table: &mut Table, config: &CensusConfig) -> Result<()> {
    stage.check(table, config)?;
    stage.apply(table, config)
}

/// One stage outside a pipeline, so the config has not been validated yet
fn run_single(stage: &dyn Stage, table: &mut Table, config: &CensusConfig) -> Result<()> {
    config.validate()?;
    run_stage(stage, table, config)
}

/// Step 1: sum consolidation sources into their targets and drop the sources
pub fn add_race_consolidation(table: &mut Table, config: &CensusConfig) -> Result<()> {
    run_single(&ConsolidateRaces, table, config)
}

/// Step 2: residual "other" race per base subgroup
pub fn add_other_columns(table: &mut Table, config: &CensusConfig) -> Result<()> {
    run_single(&OtherRace, table, config)
}

/// Step 3: disenfranchised voting-age population, overall and per race
pub fn add_dvap_columns(table: &mut Table, config: &CensusConfig) -> Result<()> {
    run_single(&DvapCounts, table, config)
}

/// Step 4: DVAP share of adults, overall and per race
pub fn add_dvap_proportion_columns(table: &mut Table, config: &CensusConfig) -> Result<()> {
    run_single(&DvapProportions, table, config)
}

/// Step 5: race shares of every subgroup, DVAP included
pub fn add_share_columns(table: &mut Table, config: &CensusConfig) -> Result<()> {
    run_single(&RaceShares, table, config)
}

/// Step 6: representation disparity per race
pub fn add_disparity_columns(table: &mut Table, config: &CensusConfig) -> Result<()> {
    run_single(&Disparities, table, config)
}

/// Step 7: aggregate disparity score
pub fn add_disparity_score_columns(table: &mut Table, config: &CensusConfig) -> Result<()> {
    run_single(&DisparityScore, table, config)
}
