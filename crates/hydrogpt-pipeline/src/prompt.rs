//! Prompt assembly
//!
//! The instruction template is static configuration content, shipped as a
//! data asset and embedded at compile time. Assembly is plain concatenation
//! of the template, the current data digest, and the literal user query;
//! nothing is truncated.

/// Fixed instruction template sent with every model call
pub const SYSTEM_PROMPT: &str = include_str!("../assets/system_prompt.txt");

/// Assemble the full payload for the model
pub fn assemble(digest: &str, query: &str) -> String {
    format!(
        "{SYSTEM_PROMPT}\n\
         \n\
         CURRENT DATA CONTEXT:\n\
         {digest}\n\
         \n\
         USER QUERY: {query}\n\
         \n\
         Respond with JSON containing text_response and appropriate \
         map_instructions/chart_instructions based on the query type.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_content() {
        assert!(SYSTEM_PROMPT.contains("You are HydroGPT"));
        assert!(SYSTEM_PROMPT.contains("zoom_to_comparison"));
        assert!(SYSTEM_PROMPT.contains("Very Weak (0-1.0)"));
    }

    #[test]
    fn test_assemble_order_and_content() {
        let prompt = assemble("DIGEST-BLOCK", "Compare Makima and Karaba");

        let template_pos = prompt.find("You are HydroGPT").unwrap();
        let digest_pos = prompt.find("DIGEST-BLOCK").unwrap();
        let query_pos = prompt.find("USER QUERY: Compare Makima and Karaba").unwrap();
        assert!(template_pos < digest_pos);
        assert!(digest_pos < query_pos);

        assert!(prompt.contains("CURRENT DATA CONTEXT:\nDIGEST-BLOCK"));
        assert!(prompt.ends_with("based on the query type.\n"));
    }
}
