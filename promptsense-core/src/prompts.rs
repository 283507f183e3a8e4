//! Fixed instructions, response schemas and the built-in sample prompt.
//!
//! Schemas use the service's OpenAPI-subset type names (`OBJECT`, `STRING`, ...).
//! Field names must stay in step with the serde names in `types.rs`.

use serde_json::{json, Value};

/// Sample prompt loaded by the "try example" action.
pub const SAMPLE_PROMPT: &str = "\
# GOAL
Build a high-fidelity habit tracker dashboard.

# USER
Productivity enthusiasts who want a minimalist way to track daily routines.

# PLATFORM
Web app (React + Tailwind), responsive for mobile.

# FEATURES
- Dashboard showing a 7-day progress grid.
- Modal to add new habits with color labels.
- Weekly summary chart using Recharts.
- Supabase authentication and data persistence.

# UX REQUIREMENTS
- Use a dark mode theme by default.
- Soft animations when toggling habit completion.
- One-click 'Done' status from the main view.

# CONSTRAINTS
- Do not use complex libraries for the grid, just pure CSS/Tailwind.";

pub const ANALYZE_SYSTEM: &str = "\
You are a Senior Lovable Vibe-Coding Architect.
Your mission is to help users generate high-quality full-stack apps (React/Tailwind/Supabase) by optimizing their prompts.

Evaluate the prompt's 'Vibe Quality' and populate the checklist sections.

'prioritizedActions': Identify the 2-3 most critical missing pieces or vague areas. Use clear, direct language like \"Add target user description\" or \"Clarify data source\".

REWRITE INSTRUCTION:
The 'refinedPrompt' must be a master-class in Lovable prompting.
Use structured Markdown with these exact headers:
# GOAL
# USER
# PLATFORM
# FEATURES
# UX REQUIREMENTS
# CONSTRAINTS

Be specific about UI interactions and data handling to minimize Lovable hallucinations.
In 'whatsChanged', highlight the technical steering you added.";

pub const DEBUG_SYSTEM: &str = "\
You are a Lovable Debugging Specialist.
The user is 'vibe-coding' and just got an unexpected result or a technical error in their Lovable preview.

Analyze the delta between the prompt and the result.
1. Use the framing: \"Lovable interpreted this as...\"
2. Identify the 'Vibe Shift': where did the prompt lose its clarity?
3. Provide the 'Instant Fix': the exact string to paste into the next iteration to correct course.

Keep feedback fast, punchy, and professional. Avoid generic AI advice. Focus on Lovable's specific behaviors.";

/// User content for the analyze call.
pub fn analyze_content(prompt: &str) -> String {
    format!("Evaluate this prompt for Lovable's vibe-coding engine: \n\n\"{prompt}\"")
}

/// User content for the fix-advice call.
pub fn debug_content(original_prompt: &str, observed_output: &str) -> String {
    format!(
        "User Prompt: \"{original_prompt}\"\n\nLovable Generation Result/Error: \"{observed_output}\""
    )
}

fn checklist_item_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "label": { "type": "STRING" },
            "status": { "type": "BOOLEAN" },
            "feedback": { "type": "STRING" }
        },
        "required": ["label", "status", "feedback"]
    })
}

fn string_list(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" },
        "description": description
    })
}

/// Required response shape for the analyze call.
pub fn analysis_schema() -> Value {
    let item = checklist_item_schema();
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "INTEGER",
                "description": "A score from 0 to 100 representing how well Lovable will be able to 'vibe-code' this prompt."
            },
            "summary": {
                "type": "STRING",
                "description": "A 1-line assessment of the prompt's 'vibe' and suitability for Lovable."
            },
            "strengths": string_list("Specific 'Vibe Wins': elements that will help Lovable generate the right UI/Logic."),
            "weaknesses": string_list("Specific 'Vibe Gaps': areas where Lovable might hallucinate or miss the mark."),
            "checklist": {
                "type": "OBJECT",
                "properties": {
                    "context": {
                        "type": "ARRAY",
                        "items": item,
                        "description": "Checks for Goal, User, and Platform context."
                    },
                    "structure": {
                        "type": "ARRAY",
                        "items": item,
                        "description": "Checks for Feature lists, Page flows, and Markdown formatting."
                    },
                    "uxDetails": {
                        "type": "ARRAY",
                        "items": item,
                        "description": "Checks for specific UI constraints, Interactions, and Animations."
                    }
                },
                "required": ["context", "structure", "uxDetails"]
            },
            "prioritizedActions": string_list("2-3 direct, prioritized actions the user should take to improve the prompt immediately."),
            "refinedPrompt": {
                "type": "STRING",
                "description": "A high-fidelity structured prompt optimized for Lovable's full-stack capabilities."
            },
            "whatsChanged": string_list("Specific technical details or UX constraints added to steer Lovable better.")
        },
        "required": [
            "score", "summary", "strengths", "weaknesses", "checklist",
            "prioritizedActions", "refinedPrompt", "whatsChanged"
        ]
    })
}

/// Required response shape for the fix-advice call.
pub fn advice_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "misunderstanding": {
                "type": "STRING",
                "description": "Explicitly frame as: 'Lovable interpreted this as [X] because [Y]'."
            },
            "rootCause": {
                "type": "STRING",
                "description": "Explain why the 'vibe' shifted, referencing Lovable's tendency to prioritize certain keywords or patterns."
            },
            "fix": {
                "type": "STRING",
                "description": "The exact sentence or technical constraint to add to the prompt for a successful next iteration."
            }
        },
        "required": ["misunderstanding", "rootCause", "fix"]
    })
}
