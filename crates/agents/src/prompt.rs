use pdfqa_memory::RetrievalMatch;

/// Returned instead of calling the model when retrieval found nothing to
/// ground an answer in.
pub const NO_CONTEXT_ANSWER: &str =
    "I don't know. No relevant information found. Please upload a document first.";

/// Separator between retrieved chunks in the context block.
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Join the text of every match, in match order, separated by a blank line.
///
/// Matches without text metadata contribute nothing, so an all-empty result
/// set yields an empty context.
pub fn build_context(matches: &[RetrievalMatch]) -> String {
    matches
        .iter()
        .filter_map(|m| m.text.as_deref())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Build the grounding prompt: answer only from `context`, otherwise say
/// "I don't know".
pub fn build_grounded_prompt(context: &str, question: &str) -> String {
    format!(
        concat!(
            "You are an assistant answering questions ONLY using the context below.\n",
            "If the answer is not in the context, say \"I don't know\".\n\n",
            "Context:\n{context}\n\n",
            "Question:\n{question}\n",
        ),
        context = context,
        question = question,
    )
}
