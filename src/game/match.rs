//! Match state and authoritative frame step

use std::collections::BTreeMap;
use std::f32::consts::PI;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::app::SimContext;
use crate::util::time::elapsed_since;

use super::class::CatalogError;
use super::combat::HitResult;
use super::combatant::Combatant;
use super::maps::{Arena, MapError};
use super::obstacle::ObstacleField;
use super::score::{score, ScoreInput};
use super::{Intent, MatchRules};

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Combat in progress
    Running,
    /// Result decided, waiting out the grace period
    Over,
    /// Scores frozen and the record handed out
    Closed,
}

/// Match result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "seat", rename_all = "snake_case")]
pub enum Winner {
    Player(usize),
    Draw,
}

impl Winner {
    pub fn seat(&self) -> Option<usize> {
        match self {
            Self::Player(i) => Some(*i),
            Self::Draw => None,
        }
    }
}

/// What a frame step produced, for the caller driving the loop
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Combat continues
    Running,
    /// The match was decided this frame
    Ended { winner: Winner },
    /// Decided earlier, grace period still running
    GraceWait,
    /// Grace period elapsed: scores are final, go back to the lobby and save this
    ReturnToLobby(MatchRecord),
    /// Record already handed out
    Closed,
    /// A seat asked to abandon the match; nothing was simulated
    AbortRequested,
}

/// One seat at match setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub id: Uuid,
    pub name: String,
    pub class_id: String,
}

impl PlayerSlot {
    pub fn new(id: Uuid, name: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            class_id: class_id.into(),
        }
    }
}

/// Everything chosen in the lobby before a match starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub players: [PlayerSlot; 2],
    /// Map id, `None` for an open arena bounded by its edges
    pub map: Option<String>,
}

/// Completion record handed to persistence exactly once per match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: Uuid,
    pub player1_id: Uuid,
    pub player2_id: Uuid,
    pub player1_score: i32,
    pub player2_score: i32,
    pub winner_id: Option<Uuid>,
    pub player1_class: String,
    pub player2_class: String,
    pub duration_ms: u64,
    pub played_at: DateTime<Utc>,
}

/// Match construction errors
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error(transparent)]
    Class(#[from] CatalogError),

    #[error(transparent)]
    Map(#[from] MapError),
}

/// The authoritative two-seat match
#[derive(Debug)]
pub struct GameMatch {
    id: Uuid,
    rules: MatchRules,
    arena: Arena,
    obstacles: Option<ObstacleField>,
    map: Option<String>,
    players: [PlayerSlot; 2],
    combatants: [Combatant; 2],

    phase: MatchPhase,
    frame: u64,
    started_at: u64,
    remaining_ms: u64,
    ended_at: Option<u64>,
    winner: Option<Winner>,

    // Hit bookkeeping, indexed by attacking seat
    last_hit_at: [Option<u64>; 2],
    combo: [f32; 2],
    damage_dealt: [BTreeMap<String, f32>; 2],
    final_scores: Option<[i32; 2]>,
    /// Hits confirmed on the latest frame
    last_hits: Vec<HitResult>,
}

impl GameMatch {
    /// Set up a match at clock reading `now`.
    ///
    /// Fails if a class or the map is not in the context's catalogs.
    pub fn new(ctx: &SimContext, setup: MatchSetup, now: u64) -> Result<Self, MatchError> {
        let arena = ctx.arena;
        let obstacles = setup
            .map
            .as_deref()
            .map(|id| ctx.maps.build(id, arena))
            .transpose()?;

        let spawns = [
            (arena.width * 0.2, arena.height * 0.5, 0.0),
            (arena.width * 0.8, arena.height * 0.5, PI),
        ];
        let [slot_a, slot_b] = &setup.players;
        let combatants = [
            Combatant::new(
                0,
                ctx.classes.get(&slot_a.class_id)?.clone(),
                spawns[0].0,
                spawns[0].1,
                spawns[0].2,
            ),
            Combatant::new(
                1,
                ctx.classes.get(&slot_b.class_id)?.clone(),
                spawns[1].0,
                spawns[1].1,
                spawns[1].2,
            ),
        ];

        let game = Self {
            id: Uuid::new_v4(),
            rules: ctx.rules.clone(),
            arena,
            obstacles,
            map: setup.map,
            players: setup.players,
            combatants,
            phase: MatchPhase::Running,
            frame: 0,
            started_at: now,
            remaining_ms: ctx.rules.match_duration_ms,
            ended_at: None,
            winner: None,
            last_hit_at: [None, None],
            combo: [1.0, 1.0],
            damage_dealt: [BTreeMap::new(), BTreeMap::new()],
            final_scores: None,
            last_hits: Vec::new(),
        };

        info!(
            match_id = %game.id,
            map = game.map.as_deref().unwrap_or("open"),
            class_1 = %game.players[0].class_id,
            class_2 = %game.players[1].class_id,
            "Match started"
        );

        Ok(game)
    }

    /// Advance one frame with each seat's intent at clock reading `now`
    pub fn tick(&mut self, intents: [Intent; 2], now: u64) -> TickOutcome {
        match self.phase {
            MatchPhase::Closed => return TickOutcome::Closed,
            MatchPhase::Over => return self.wait_for_lobby(now),
            MatchPhase::Running => {}
        }

        if intents.iter().any(|i| i.abort) {
            return TickOutcome::AbortRequested;
        }

        self.frame += 1;
        self.remaining_ms = self
            .rules
            .match_duration_ms
            .saturating_sub(elapsed_since(self.started_at, now));

        let obstacles = self.obstacles.as_ref();
        for (combatant, intent) in self.combatants.iter_mut().zip(intents) {
            let intent = intent.sanitized();
            combatant.move_by(intent.dx, intent.dy, obstacles, self.arena);
            if intent.fire {
                combatant.shoot(now, &self.rules);
            }
            if intent.shield {
                combatant.activate_shield(now, &self.rules);
            }
            combatant.update(now, &self.rules, self.arena, obstacles);
        }

        self.last_hits = self.resolve_collisions(now);

        match self.check_game_over(now) {
            Some(winner) => TickOutcome::Ended { winner },
            None => TickOutcome::Running,
        }
    }

    /// Discard the match without recording anything
    pub fn abort(self) {
        info!(
            match_id = %self.id,
            frame = self.frame,
            phase = ?self.phase,
            "Match aborted, result discarded"
        );
    }

    /// Projectile-vs-hull hits, shooter-major then projectile order.
    /// Each hit consumes its projectile.
    fn resolve_collisions(&mut self, now: u64) -> Vec<HitResult> {
        let mut hits = Vec::new();

        for shooter in 0..2 {
            let target = 1 - shooter;
            let target_hull = self.combatants[target].hull();

            let mut idx = 0;
            while idx < self.combatants[shooter].projectiles().len() {
                if !self.combatants[shooter].projectiles()[idx].check_hit(&target_hull) {
                    idx += 1;
                    continue;
                }

                let Some(projectile) = self.combatants[shooter].consume_projectile(idx) else {
                    break;
                };
                let outcome = self.combatants[target].take_damage(projectile.damage);
                self.record_hit(shooter, projectile.damage, now);

                debug!(
                    match_id = %self.id,
                    shooter,
                    target,
                    damage = projectile.damage,
                    removed = outcome.removed(),
                    outcome = ?outcome,
                    combo = self.combo[shooter],
                    "Hit"
                );
                if outcome.killed() {
                    info!(match_id = %self.id, shooter, target, frame = self.frame, "Combatant destroyed");
                }

                hits.push(HitResult {
                    shooter,
                    target,
                    damage: projectile.damage,
                    outcome,
                    x: projectile.x,
                    y: projectile.y,
                });
            }
        }

        hits
    }

    /// Damage and combo bookkeeping for a confirmed hit.
    ///
    /// The full projectile damage is credited to the shooter on every overlap,
    /// whether the shield negated it or it ran past the remaining health.
    fn record_hit(&mut self, shooter: usize, damage: f32, now: u64) {
        let opponent_class = self.combatants[1 - shooter].profile.id.clone();
        *self.damage_dealt[shooter].entry(opponent_class).or_insert(0.0) += damage;

        let in_window = self.last_hit_at[shooter]
            .is_some_and(|at| elapsed_since(at, now) < self.rules.combo_window_ms);
        self.combo[shooter] = if in_window {
            (self.combo[shooter] + self.rules.combo_step).min(self.rules.combo_max)
        } else {
            1.0
        };
        self.last_hit_at[shooter] = Some(now);
    }

    /// Decide the match if it is over.
    ///
    /// Time expiry is checked before health: a seat dying on the frame the
    /// clock runs out is resolved by comparing health, not as a kill.
    fn check_game_over(&mut self, now: u64) -> Option<Winner> {
        if self.phase != MatchPhase::Running {
            return None;
        }

        let winner = if self.remaining_ms == 0 {
            let (h0, h1) = (self.combatants[0].health(), self.combatants[1].health());
            if h0 > h1 {
                Winner::Player(0)
            } else if h1 > h0 {
                Winner::Player(1)
            } else {
                Winner::Draw
            }
        } else if let Some(fallen) = self.combatants.iter().position(|c| !c.is_alive()) {
            Winner::Player(1 - fallen)
        } else {
            return None;
        };

        self.phase = MatchPhase::Over;
        self.winner = Some(winner);
        self.ended_at = Some(now);

        info!(
            match_id = %self.id,
            winner = ?winner,
            frame = self.frame,
            remaining_ms = self.remaining_ms,
            "Match ended"
        );

        Some(winner)
    }

    fn wait_for_lobby(&mut self, now: u64) -> TickOutcome {
        let ended_at = self.ended_at.unwrap_or(now);
        if elapsed_since(ended_at, now) < self.rules.game_over_grace_ms {
            return TickOutcome::GraceWait;
        }
        TickOutcome::ReturnToLobby(self.finalize())
    }

    /// Freeze scores and build the completion record. Runs once.
    fn finalize(&mut self) -> MatchRecord {
        let scores = [self.live_score(0), self.live_score(1)];
        self.final_scores = Some(scores);
        self.phase = MatchPhase::Closed;

        let ended_at = self.ended_at.unwrap_or(self.started_at);
        let record = MatchRecord {
            match_id: self.id,
            player1_id: self.players[0].id,
            player2_id: self.players[1].id,
            player1_score: scores[0],
            player2_score: scores[1],
            winner_id: self
                .winner
                .and_then(|w| w.seat())
                .map(|seat| self.players[seat].id),
            player1_class: self.combatants[0].profile.id.clone(),
            player2_class: self.combatants[1].profile.id.clone(),
            duration_ms: elapsed_since(self.started_at, ended_at).min(self.rules.match_duration_ms),
            played_at: Utc::now(),
        };

        info!(
            match_id = %self.id,
            player1_score = scores[0],
            player2_score = scores[1],
            duration_ms = record.duration_ms,
            "Scores finalized"
        );

        record
    }

    fn live_score(&self, seat: usize) -> i32 {
        let other = 1 - seat;
        score(ScoreInput {
            damage_dealt: self.total_damage_dealt(seat),
            damage_received: self.total_damage_dealt(other),
            self_max_health: self.combatants[seat].max_health(),
            opponent_max_health: self.combatants[other].max_health(),
            victorious: self.winner == Some(Winner::Player(seat)),
        })
    }

    /// Current score of a seat: provisional while running, frozen once closed
    pub fn score(&self, seat: usize) -> i32 {
        match self.final_scores {
            Some(scores) => scores[seat],
            None => self.live_score(seat),
        }
    }

    pub fn final_scores(&self) -> Option<[i32; 2]> {
        self.final_scores
    }

    pub fn total_damage_dealt(&self, seat: usize) -> f32 {
        self.damage_dealt[seat].values().fold(0.0, |total, v| total + v)
    }

    /// Damage a seat dealt, keyed by the opposing class id
    pub fn damage_by_class(&self, seat: usize) -> &BTreeMap<String, f32> {
        &self.damage_dealt[seat]
    }

    /// Hits confirmed on the latest simulated frame
    pub fn last_hits(&self) -> &[HitResult] {
        &self.last_hits
    }

    pub fn combo(&self, seat: usize) -> f32 {
        self.combo[seat]
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase != MatchPhase::Running
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn map(&self) -> Option<&str> {
        self.map.as_deref()
    }

    pub fn obstacles(&self) -> Option<&ObstacleField> {
        self.obstacles.as_ref()
    }

    pub fn players(&self) -> &[PlayerSlot; 2] {
        &self.players
    }

    pub fn combatants(&self) -> &[Combatant; 2] {
        &self.combatants
    }

    pub fn combatant(&self, seat: usize) -> &Combatant {
        &self.combatants[seat]
    }

    /// Mutable access for scripted setups
    pub fn combatant_mut(&mut self, seat: usize) -> &mut Combatant {
        &mut self.combatants[seat]
    }
}
