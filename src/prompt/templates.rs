pub const TEXT_USER_INSTRUCTION: &str = "Analyze ONLY the data provided above. Do not invent \
requirements or make assumptions beyond what the data explicitly states.";

pub const VIDEO_USER_INSTRUCTION: &str = "Analyze the provided video frames.";

pub(super) fn text_analysis(
    content: &str,
    input_type: &str,
    source_system: &str,
    destination_system: &str,
) -> String {
    format!(
        r#"You are a Solution Architect specializing in system migrations.

**Input Type:** {input_type}
**Source System:** {source_system}
**Destination System:** {destination_system}

The content extracted from the uploaded file follows. Tabular sources are rendered as text tables.

{content}

Working STRICTLY from the data above:
1. List every requirement that appears in the data. Do not invent or assume requirements.
2. Turn each requirement you found into a user story of the form:
   *As a [role], I want [goal] so that [benefit]*
3. Produce a fit-gap analysis between {source_system} and {destination_system} covering only the requirements you found.

Structure the response exactly like this:

REQUIREMENTS FROM DATA:
- [requirements found in the data]

USER STORIES:
- [one user story per requirement found]

FIT-GAP ANALYSIS:
- [fit or gap for each requirement found]

DO NOT generate or assume requirements that are not explicitly present in the data."#
    )
}

pub(super) fn video_analysis(
    frames_description: &str,
    source_system: &str,
    destination_system: &str,
) -> String {
    format!(
        r#"You are a Solution Architect specializing in system migrations.
Analyze the following video frames to extract project requirements.

**Source System:** {source_system}
**Destination System:** {destination_system}

Video Frames Content:
{frames_description}

Extract:
1. Detailed business requirements.
2. User stories in the format:
   *As a [role], I want [goal] so that [benefit]*
3. A fit-gap analysis for the migration from {source_system} to {destination_system}.

Return the results as a structured table."#
    )
}
