//! Evolution line reconstruction.
//!
//! Creature entries are indexed by name and each Stage 1 / Stage 2 card walks
//! its `evolves_from` references back toward a Basic. Walks are capped at
//! [`MAX_CHAIN_DEPTH`] hops and track visited cards, so cyclic or dangling
//! references end the walk instead of looping.

use crate::analysis::probability::setup_probability;
use crate::card::predicates::{is_evolution_skip_card, normalize_name};
use crate::card::Stage;
use crate::deck::Deck;
use serde::Serialize;
use std::collections::HashMap;

pub const MAX_CHAIN_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Single,
    Double,
}

/// Stage that insufficiently supports the stage above it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bottleneck {
    Basic,
    Stage1,
    Stage2,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineIssue {
    Complete,
    MissingBasic,
    MissingStage1,
    Quantity,
    Unresolved,
}

/// The cards filling one stage of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSlot {
    pub names: Vec<String>,
    pub quantity: u32,
}

/// Odds of having each stage out on time, computed from the line's own slots.
///
/// A Stage 2 whose Stage 1 is not listed at all is keyed by the missing Stage 1
/// and never linked to a Basic, so its `turn_three_stage2` is 0.0 regardless
/// of the Basics or skip cards elsewhere in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConsistency {
    pub turn_two_stage1: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_three_stage2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionLine {
    /// Name of the earliest known ancestor
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic: Option<StageSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage1: Option<StageSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage2: Option<StageSlot>,
    pub line_type: LineType,
    pub bottleneck: Bottleneck,
    pub issue: LineIssue,
    /// Evolution-skip card that excuses the bottleneck
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed_by: Option<String>,
    pub consistency: LineConsistency,
}

impl EvolutionLine {
    pub fn quantity(slot: &Option<StageSlot>) -> u32 {
        slot.as_ref().map(|s| s.quantity).unwrap_or(0)
    }

    pub fn basic_count(&self) -> u32 {
        Self::quantity(&self.basic)
    }

    pub fn stage1_count(&self) -> u32 {
        Self::quantity(&self.stage1)
    }

    pub fn stage2_count(&self) -> u32 {
        Self::quantity(&self.stage2)
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed_by.is_some()
    }

    /// Bottleneck that still needs fixing after evolution-skip cards are considered
    pub fn active_bottleneck(&self) -> Bottleneck {
        if self.is_suppressed() {
            Bottleneck::None
        } else {
            self.bottleneck
        }
    }
}

/// A creature name with all same-named entries folded together
#[derive(Debug)]
struct CreatureNode {
    name: String,
    stage: Option<Stage>,
    evolves_from: Option<String>,
    quantity: u32,
}

struct CreatureIndex {
    nodes: Vec<CreatureNode>,
    by_name: HashMap<String, usize>,
}

impl CreatureIndex {
    fn build(deck: &Deck) -> Self {
        let mut nodes: Vec<CreatureNode> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        for entry in deck.creature_entries() {
            let key = normalize_name(&entry.card.name);
            match by_name.get(&key) {
                Some(&idx) => {
                    nodes[idx].quantity = nodes[idx].quantity.saturating_add(entry.quantity)
                }
                None => {
                    by_name.insert(key, nodes.len());
                    nodes.push(CreatureNode {
                        name: entry.card.name.clone(),
                        stage: entry.card.stage(),
                        evolves_from: entry.card.evolves_from.clone(),
                        quantity: entry.quantity,
                    });
                }
            }
        }
        CreatureIndex { nodes, by_name }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.by_name.get(&normalize_name(name)).copied()
    }

    /// True when some other present Stage 2 evolves from `stage1`
    fn has_stage2_child(&self, stage1: usize) -> bool {
        let name = normalize_name(&self.nodes[stage1].name);
        self.nodes.iter().enumerate().any(|(idx, node)| {
            idx != stage1
                && node.quantity > 0
                && node.stage == Some(Stage::Stage2)
                && node
                    .evolves_from
                    .as_deref()
                    .map(|parent| normalize_name(parent) == name)
                    .unwrap_or(false)
        })
    }
}

/// One walk from an evolved card back toward its Basic
#[derive(Debug, Default)]
struct Chain {
    basic: Option<usize>,
    stage1: Option<usize>,
    stage2: Option<usize>,
    key: String,
    unresolved: bool,
}

fn resolve_chain(index: &CreatureIndex, start: usize) -> Chain {
    let mut chain = Chain::default();
    let mut visited = vec![start];
    let mut current = start;
    let mut earliest_reference: Option<&str> = None;

    place(&mut chain, index, start);

    for _ in 0..MAX_CHAIN_DEPTH {
        let Some(parent_name) = index.nodes[current].evolves_from.as_deref() else {
            break;
        };
        earliest_reference = Some(parent_name);

        let Some(parent) = index.find(parent_name) else {
            break;
        };
        if visited.contains(&parent) {
            break;
        }
        // Parent must sit at a strictly earlier stage
        let (Some(child_stage), Some(parent_stage)) =
            (index.nodes[current].stage, index.nodes[parent].stage)
        else {
            break;
        };
        if parent_stage >= child_stage {
            break;
        }

        visited.push(parent);
        place(&mut chain, index, parent);
        current = parent;
    }

    chain.key = match (chain.basic, earliest_reference) {
        (Some(basic), _) => index.nodes[basic].name.clone(),
        (None, Some(reference)) => reference.to_string(),
        (None, None) => {
            chain.unresolved = true;
            index.nodes[start].name.clone()
        }
    };
    chain
}

/// Record a node in its stage slot; zero-copy entries only help resolve names
fn place(chain: &mut Chain, index: &CreatureIndex, idx: usize) {
    let node = &index.nodes[idx];
    if node.quantity == 0 {
        return;
    }
    match node.stage {
        Some(Stage::Basic) => chain.basic = Some(idx),
        Some(Stage::Stage1) => chain.stage1 = Some(idx),
        Some(Stage::Stage2) => chain.stage2 = Some(idx),
        None => {}
    }
}

/// Chains sharing a key, merged
#[derive(Debug, Default)]
struct LineGroup {
    key: String,
    basic: Vec<usize>,
    stage1: Vec<usize>,
    stage2: Vec<usize>,
    unresolved: bool,
}

impl LineGroup {
    fn absorb(&mut self, chain: Chain) {
        push_unique(&mut self.basic, chain.basic);
        push_unique(&mut self.stage1, chain.stage1);
        push_unique(&mut self.stage2, chain.stage2);
        self.unresolved |= chain.unresolved;
    }
}

fn push_unique(slot: &mut Vec<usize>, idx: Option<usize>) {
    if let Some(idx) = idx {
        if !slot.contains(&idx) {
            slot.push(idx);
        }
    }
}

fn slot(index: &CreatureIndex, members: &[usize]) -> Option<StageSlot> {
    if members.is_empty() {
        return None;
    }
    Some(StageSlot {
        names: members.iter().map(|&i| index.nodes[i].name.clone()).collect(),
        quantity: members
            .iter()
            .map(|&i| index.nodes[i].quantity)
            .fold(0, u32::saturating_add),
    })
}

/// Rebuild every evolution line in the deck, in order of first appearance
pub fn build_evolution_lines(deck: &Deck, hand_size: u32) -> Vec<EvolutionLine> {
    let index = CreatureIndex::build(deck);

    let mut groups: Vec<LineGroup> = Vec::new();
    let mut group_by_key: HashMap<String, usize> = HashMap::new();

    for (idx, node) in index.nodes.iter().enumerate() {
        if node.quantity == 0 || !matches!(node.stage, Some(Stage::Stage1) | Some(Stage::Stage2)) {
            continue;
        }
        let chain = resolve_chain(&index, idx);
        let key = normalize_name(&chain.key);
        let group_idx = *group_by_key.entry(key).or_insert_with(|| {
            groups.push(LineGroup {
                key: chain.key.clone(),
                ..LineGroup::default()
            });
            groups.len() - 1
        });
        groups[group_idx].absorb(chain);
    }

    let deck_size = deck.total_cards();
    let skip_card = deck
        .entries
        .iter()
        .find(|e| e.quantity > 0 && is_evolution_skip_card(&e.card))
        .map(|e| e.card.name.clone());
    let skip_copies = deck.count_where(is_evolution_skip_card);

    groups
        .into_iter()
        .map(|group| {
            diagnose(
                &index,
                group,
                deck_size,
                hand_size,
                skip_card.as_deref(),
                skip_copies,
            )
        })
        .collect()
}

fn diagnose(
    index: &CreatureIndex,
    group: LineGroup,
    deck_size: u32,
    hand_size: u32,
    skip_card: Option<&str>,
    skip_copies: u32,
) -> EvolutionLine {
    let basic = slot(index, &group.basic);
    let stage1 = slot(index, &group.stage1);
    let stage2 = slot(index, &group.stage2);

    let basic_q = EvolutionLine::quantity(&basic);
    let stage1_q = EvolutionLine::quantity(&stage1);
    let stage2_q = EvolutionLine::quantity(&stage2);

    let line_type = if stage2.is_some() || group.stage1.iter().any(|&s| index.has_stage2_child(s)) {
        LineType::Double
    } else {
        LineType::Single
    };

    let (issue, bottleneck) = if group.unresolved && basic.is_none() {
        (LineIssue::Unresolved, Bottleneck::None)
    } else if stage1.is_some() && basic.is_none() {
        (LineIssue::MissingBasic, Bottleneck::Basic)
    } else if stage2.is_some() && stage1.is_none() {
        (LineIssue::MissingStage1, Bottleneck::Stage1)
    } else if stage1_q > basic_q {
        (LineIssue::Quantity, Bottleneck::Basic)
    } else if stage2_q > stage1_q {
        (LineIssue::Quantity, Bottleneck::Stage1)
    } else {
        (LineIssue::Complete, Bottleneck::None)
    };

    // Skip cards jump from Basic to Stage 2, so they only excuse a thin Stage 1
    let suppressed_by = match bottleneck {
        Bottleneck::Stage1 => skip_card.map(str::to_string),
        _ => None,
    };

    let turn_two_stage1 = if stage1.is_some() {
        setup_probability(deck_size, hand_size, &[basic_q, stage1_q], 2)
    } else {
        0.0
    };
    let turn_three_stage2 = stage2.as_ref().map(|_| {
        setup_probability(
            deck_size,
            hand_size,
            &[basic_q, stage1_q.saturating_add(skip_copies), stage2_q],
            3,
        )
    });

    EvolutionLine {
        key: group.key,
        basic,
        stage1,
        stage2,
        line_type,
        bottleneck,
        issue,
        suppressed_by,
        consistency: LineConsistency {
            turn_two_stage1,
            turn_three_stage2,
        },
    }
}
