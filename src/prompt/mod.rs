//! Prompt construction for the formalization loop.
//!
//! Pure functions, no state or network access. A fixed few-shot block of
//! solved natural-language → Lean translations steers the completion model,
//! and every prompt ends with the literal `theorem` continuation so the
//! model resumes mid-declaration.

/// Few-shot exemplar block prepended to every prompt.
pub const FEW_SHOT_PROMPT: &str = r#"Natural language version: "If $z_1, \dots, z_n$ are complex, then $|z_1 + z_2 + \dots + z_n|\leq |z_1| + |z_2| + \dots + |z_n|$." Translate the natural language version to a Lean mathlib version:
theorem abs_sum_leq_sum_abs (n : ℕ) (f : ℕ → ℂ) :
  abs (∑ i in finset.range n, f i) ≤ ∑ i in finset.range n, abs (f i) :=

Natural language version: "If x and y are in $\mathbb{R}^n$, then $|x+y|^2 + |x-y|^2 = 2|x|^2 + 2|y|^2$." Translate the natural language version to a Lean mathlib version:
theorem sum_add_square_sub_square_eq_sum_square (n : ℕ) (x y : euclidean_space ℝ (fin n)) :
  ∥x + y∥^2 + ∥x - y∥^2 = 2*∥x∥^2 + 2*∥y∥^2 :=

Natural language version: "If $x$ is an element of infinite order in $G$, prove that the elements $x^n$, $n\in\mathbb{Z}$ are all distinct." Translate the natural language version to a Lean mathlib version:
theorem distinct_powers_of_infinite_order_element (G : Type*) [group G] (x : G)
  (hx : x ≠ 1) (hx_inf : ∀ n : ℕ, x ^ n ≠ 1) :
  ∀ m n : ℤ, m ≠ n → x ^ m ≠ x ^ n :=

Natural language version: "Let $X$ be a topological space; let $A$ be a subset of $X$. Suppose that for each $x\in A$ there is an open set $U$ containing $x$ such that $U\subset A$. Show that $A$ is open in $X$." Translate the natural language version to a Lean mathlib version:
theorem subset_of_open_subset_is_open (X : Type*) [topological_space X]
  (A : set X) (hA : ∀ x ∈ A, ∃ U : set X, is_open U ∧ x ∈ U ∧ U ⊆ A):
  is_open A :="#;

/// Token sequence every prompt ends with; the model continues from here.
pub const CONTINUATION_MARKER: &str = "\ntheorem";

/// Stop sequence for generation. Re-appended to accepted statements, where
/// it opens the theorem's proof body.
pub const STOP_MARKER: &str = ":=";

const TRANSLATE_INSTRUCTION: &str =
    "Translate the natural language version to a Lean mathlib version:";
const TRY_AGAIN_INSTRUCTION: &str = "Try again:";

/// Build the prompt for a fresh natural-language statement.
pub fn initial_prompt(statement: &str) -> String {
    format!(
        "{FEW_SHOT_PROMPT}\n\nNatural language version: \"{statement}\" {TRANSLATE_INSTRUCTION}{CONTINUATION_MARKER}"
    )
}

/// Build the prompt for a correction to an earlier attempt.
///
/// The correction is trimmed and terminated; `prior_context` is the
/// concatenated text of the conversation so far.
pub fn followup_prompt(correction: &str, prior_context: &str) -> String {
    let correction = terminated(correction);
    format!(
        "{FEW_SHOT_PROMPT}\n{prior_context}\n{correction} {TRY_AGAIN_INSTRUCTION}{CONTINUATION_MARKER}"
    )
}

/// Trim and guarantee a trailing sentence terminator, without doubling one
/// that is already there. The check is on the last character.
fn terminated(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.ends_with('.') {
        trimmed.to_string()
    } else {
        format!("{trimmed}.")
    }
}

/// Worked example statement used by the smoke path.
pub const EXAMPLE_STATEMENT: &str =
    r"Let $a,b\in G$, Show that $ab$ and $ba$ have the same order.";

/// Prompt for [`EXAMPLE_STATEMENT`].
pub fn example_prompt() -> String {
    initial_prompt(EXAMPLE_STATEMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Initial prompt
    // =========================================================================

    #[test]
    fn test_initial_prompt_contains_few_shot_block_verbatim() {
        let prompt = initial_prompt("Every group of prime order is cyclic.");
        assert!(prompt.starts_with(FEW_SHOT_PROMPT));
    }

    #[test]
    fn test_initial_prompt_contains_statement_verbatim() {
        let statement = "Every group of prime order is cyclic.";
        let prompt = initial_prompt(statement);
        assert!(prompt.contains(statement));
    }

    #[test]
    fn test_initial_prompt_ends_with_continuation_marker() {
        let prompt = initial_prompt("Every group of prime order is cyclic.");
        assert!(prompt.ends_with(CONTINUATION_MARKER));
    }

    #[test]
    fn test_initial_prompt_is_deterministic() {
        let statement = "If $x$ is odd then $x^2$ is odd.";
        assert_eq!(initial_prompt(statement), initial_prompt(statement));
    }

    // =========================================================================
    // Follow-up prompt
    // =========================================================================

    #[test]
    fn test_followup_prompt_terminates_correction() {
        let prompt = followup_prompt("use `order_of` instead of `order`", "context");
        assert!(prompt
            .contains("use `order_of` instead of `order`. Try again:"));
        assert!(prompt.ends_with(CONTINUATION_MARKER));
    }

    #[test]
    fn test_followup_prompt_does_not_double_terminator() {
        let prompt = followup_prompt("use the group axioms.", "context");
        assert!(prompt.contains("use the group axioms. Try again:"));
        assert!(!prompt.contains("use the group axioms.. Try again:"));
    }

    #[test]
    fn test_followup_prompt_includes_prior_context() {
        let prompt = followup_prompt("shorter names", "theorem foo : 1 = 1 :=");
        assert!(prompt.contains("theorem foo : 1 = 1 :="));
    }

    #[test]
    fn test_followup_prompt_trims_correction() {
        let prompt = followup_prompt("  add hypotheses  ", "context");
        assert!(prompt.contains("\nadd hypotheses. Try again:"));
    }

    #[test]
    fn test_followup_prompt_empty_correction_still_terminated() {
        let prompt = followup_prompt("", "context");
        assert!(prompt.contains("\n. Try again:"));
        assert!(prompt.ends_with(CONTINUATION_MARKER));
    }

    // =========================================================================
    // Example prompt
    // =========================================================================

    #[test]
    fn test_example_prompt_uses_example_statement() {
        let prompt = example_prompt();
        assert!(prompt.contains(EXAMPLE_STATEMENT));
        assert!(prompt.ends_with(CONTINUATION_MARKER));
    }
}
