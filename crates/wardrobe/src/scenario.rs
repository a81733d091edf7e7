//! # Reference Scenario
//!
//! Drives one session through the canonical sequence and checks the head
//! slot after every step:
//!
//! ```text
//! enable set A (Head=1)        → Head=1
//! gag Under (Head=2, no meta)  → Head=2, meta None
//! cursed C1 (Head=3, prec 5)   → Head=3
//! cursed C2 (Head=4, prec 3)   → Head=3
//! safeword                     → Head=2 (the gag stays on)
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use wardrobe_engine::{
    EffectReceiver, EngineConfig, MockCollaborators, MutationOutcome, Wardrobe, WardrobeResult,
    WardrobeSources,
};
use wardrobe_shared::{
    ActorId, CursedId, CursedItem, CursedKind, DrawData, EquipItem, EquipSlot, GagDrawData,
    GagLayer, GagType, MetaFlags, RestraintSet, SetId,
};

/// Outcome of one scenario step.
#[derive(Clone, Debug)]
pub struct StepResult {
    /// Step name.
    pub name: &'static str,
    /// Whether the operation applied and the head slot matched.
    pub passed: bool,
    /// Wall time of the operation, redraw wait included.
    pub elapsed: Duration,
    /// Expected versus observed.
    pub details: String,
}

/// Runs the reference scenario against mock collaborators.
pub struct ReferenceScenario {
    wardrobe: Arc<Wardrobe>,
    mocks: MockCollaborators,
    effects: EffectReceiver,
    set: SetId,
    c1: CursedId,
    c2: CursedId,
    results: Vec<StepResult>,
}

fn head(item: u32) -> DrawData {
    DrawData::new(EquipSlot::Head, EquipItem::new(item))
}

impl ReferenceScenario {
    /// Builds the session and its sources.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: &EngineConfig) -> WardrobeResult<Self> {
        let set = RestraintSet::new("A").with_item(head(1));
        let c1 = CursedItem::new("C1", CursedKind::Equip(head(3))).with_precedence(5, true);
        let c2 = CursedItem::new("C2", CursedKind::Equip(head(4))).with_precedence(3, false);
        let (set_id, c1_id, c2_id) = (set.id, c1.id, c2.id);

        let mut sources = WardrobeSources::default();
        sources.restraints.insert(set);
        sources.gags.set_draw_data(GagType::BallGag, GagDrawData::new(head(2)));
        sources.cursed.insert(c1);
        sources.cursed.insert(c2);

        let mocks = MockCollaborators::new();
        let (wardrobe, effects) = Wardrobe::with_effect_bus(config, sources, mocks.collaborators())?;

        Ok(Self {
            wardrobe: Arc::new(wardrobe),
            mocks,
            effects,
            set: set_id,
            c1: c1_id,
            c2: c2_id,
            results: Vec::new(),
        })
    }

    /// Runs every step in order.
    pub async fn run_all(&mut self) {
        let wardrobe = Arc::clone(&self.wardrobe);
        let local = ActorId::local();
        let now = Utc::now();

        let start = Instant::now();
        let outcome = wardrobe.enable_restraint_set(self.set, local.clone(), true).await;
        self.record("enable set A", &outcome, start, 1);

        let start = Instant::now();
        let outcome = wardrobe.apply_gag(GagLayer::Under, GagType::BallGag, local.clone()).await;
        self.record("gag under layer", &outcome, start, 2);
        if wardrobe.appearance().meta != MetaFlags::None {
            self.fail_last(format!("meta {:?}, expected None", wardrobe.appearance().meta));
        }

        let start = Instant::now();
        let outcome = wardrobe.apply_cursed_item(self.c1, now).await;
        self.record("cursed C1", &outcome, start, 3);

        let start = Instant::now();
        let outcome = wardrobe
            .apply_cursed_item(self.c2, now + chrono::Duration::seconds(1))
            .await;
        self.record("cursed C2", &outcome, start, 3);

        let start = Instant::now();
        let outcome = wardrobe.disable_all_due_to_safeword(local).await;
        self.record("safeword", &outcome, start, 2);

        let published = self.effects.drain().len();
        tracing::info!(
            published,
            applied = self.mocks.visual.applied().len(),
            version = wardrobe.appearance_version(),
            "reference scenario finished"
        );
    }

    fn record(&mut self, name: &'static str, outcome: &MutationOutcome, start: Instant, expected: u32) {
        let elapsed = start.elapsed();
        let observed = self
            .wardrobe
            .appearance()
            .item(EquipSlot::Head)
            .map(|draw| draw.item.id.0);

        let (passed, details) = match outcome.rejection() {
            Some(err) => (false, format!("rejected: {err}")),
            None => (
                observed == Some(expected),
                format!("head {observed:?}, expected Some({expected})"),
            ),
        };

        self.results.push(StepResult {
            name,
            passed,
            elapsed,
            details,
        });
    }

    fn fail_last(&mut self, details: String) {
        if let Some(last) = self.results.last_mut() {
            last.passed = false;
            last.details = details;
        }
    }

    /// Step results so far.
    #[must_use]
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    /// True if every step passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.passed)
    }

    /// Prints a result table to stdout.
    pub fn print_results(&self) {
        println!();
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                  WARDROBE REFERENCE SCENARIO                     ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();

        for result in &self.results {
            let status = if result.passed { "✓ PASS" } else { "✗ FAIL" };
            println!("┌─ {} ", result.name);
            println!("│ Status:  {status}");
            println!("│ Elapsed: {:?}", result.elapsed);
            println!("│ Details: {}", result.details);
            println!("└──────────────────────────────────────────────────────────────────");
        }

        println!();
        if self.all_passed() {
            println!("  ALL STEPS PASSED");
        } else {
            println!("  SOME STEPS FAILED");
        }
    }
}
