//! Budget fitting: demote Tier-2 outlines, then truncate Tier-1 content,
//! until the estimated manifest size fits the limit.

use crate::manifest::{Tier1Record, Tier2Record};

/// Fixed cost reserved for the prompt wrapped around the manifest
pub const PROMPT_OVERHEAD_TOKENS: usize = 2_000;

/// Characters per estimated token
pub const CHARS_PER_TOKEN: usize = 4;

/// Lines kept from a Tier-1 file once truncation kicks in
pub const TRUNCATED_TIER1_LINES: usize = 200;

/// Line appended to truncated Tier-1 content
pub const TRUNCATION_MARKER: &str = "# ... (truncated)";

/// Estimated cost of a piece of text
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Records after budget fitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetOutcome {
    pub tier1: Vec<Tier1Record>,
    /// Kept Tier-2 records, in their original order
    pub tier2: Vec<Tier2Record>,
    /// Paths of Tier-2 records that were dropped to the listing
    pub demoted: Vec<String>,
    /// Number of Tier-1 records that were cut down
    pub truncated: usize,
    pub estimated_tokens: usize,
}

/// Greedy two-phase fitter.
///
/// Phase one keeps Tier-2 records largest-first while they fit; anything
/// that does not fit is demoted. Phase two runs only if Tier-1 alone still
/// overflows, and cuts every long Tier-1 file to its first
/// [`TRUNCATED_TIER1_LINES`] lines. The result of phase two is accepted
/// even when it is still over the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    limit: usize,
}

impl TokenBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn fit(
        &self,
        tree: &str,
        tier1: Vec<Tier1Record>,
        tier2: Vec<Tier2Record>,
    ) -> BudgetOutcome {
        let fixed = PROMPT_OVERHEAD_TOKENS + estimate_tokens(tree);
        let tier1_cost: usize = tier1.iter().map(Tier1Record::tokens).sum();
        let costs: Vec<usize> = tier2.iter().map(Tier2Record::tokens).collect();
        let total = fixed + tier1_cost + costs.iter().sum::<usize>();

        if total <= self.limit {
            return BudgetOutcome {
                tier1,
                tier2,
                demoted: Vec::new(),
                truncated: 0,
                estimated_tokens: total,
            };
        }

        log::debug!(
            "Estimated {total} tokens over limit {}; demoting Tier-2 outlines",
            self.limit
        );

        let keep = self.select_kept(fixed + tier1_cost, &costs);
        let mut kept = Vec::with_capacity(tier2.len());
        let mut demoted = Vec::new();
        let mut kept_cost = 0;
        for ((record, kept_flag), cost) in tier2.into_iter().zip(keep).zip(&costs) {
            if kept_flag {
                kept_cost += cost;
                kept.push(record);
            } else {
                demoted.push(record.path);
            }
        }

        let mut outcome = BudgetOutcome {
            tier1,
            tier2: kept,
            demoted,
            truncated: 0,
            estimated_tokens: fixed + tier1_cost + kept_cost,
        };

        if outcome.estimated_tokens > self.limit {
            log::debug!(
                "Tier-1 content alone exceeds limit {}; truncating to {TRUNCATED_TIER1_LINES} lines",
                self.limit
            );
            for record in &mut outcome.tier1 {
                if let Some(content) = truncate_lines(&record.content, TRUNCATED_TIER1_LINES) {
                    record.content = content;
                    outcome.truncated += 1;
                }
            }
            let tier1_cost: usize = outcome.tier1.iter().map(Tier1Record::tokens).sum();
            outcome.estimated_tokens = fixed + tier1_cost + kept_cost;
        }

        outcome
    }

    /// Decide which Tier-2 costs survive, starting from `base`.
    ///
    /// Candidates are ranked ascending by cost (ties by position) and
    /// visited from the expensive end, so large outlines claim the budget
    /// first and the smallest ones are demoted.
    fn select_kept(&self, base: usize, costs: &[usize]) -> Vec<bool> {
        let mut ranked: Vec<usize> = (0..costs.len()).collect();
        ranked.sort_by_key(|&i| (costs[i], i));

        let mut keep = vec![false; costs.len()];
        let mut running = base;
        for &i in ranked.iter().rev() {
            if running + costs[i] <= self.limit {
                running += costs[i];
                keep[i] = true;
            }
        }
        keep
    }
}

/// Cut `content` to its first `max_lines` lines plus the truncation marker.
///
/// Returns `None` when the content is already short enough.
pub fn truncate_lines(content: &str, max_lines: usize) -> Option<String> {
    let mut lines = content.split_inclusive('\n');
    let head_len: usize = lines.by_ref().take(max_lines).map(str::len).sum();
    lines.next()?;

    let mut truncated = String::with_capacity(head_len + TRUNCATION_MARKER.len() + 2);
    truncated.push_str(&content[..head_len]);
    truncated.push('\n');
    truncated.push_str(TRUNCATION_MARKER);
    truncated.push('\n');
    Some(truncated)
}
