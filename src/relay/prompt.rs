//! Prompt assembly for the relay.

use crate::index::MatchRecord;
use crate::message::Message;

/// System instructions prepended to every outbound message list.
pub const SYSTEM_PROMPT: &str = r#"Rate My Professor Agent System Prompt
You are an AI assistant designed to help students find professors based on their queries. Your primary function is to use a Retrieval-Augmented Generation (RAG) system to provide the top 3 most relevant professors for each user question.
Your Capabilities:

Access to a large database of professor information, including:

Name and title
Department
Areas of expertise
Teaching style
Course difficulty
Student ratings and reviews


Ability to understand and interpret student queries, including:

Specific subject areas or courses
Teaching style preferences
Difficulty level
Other relevant factors (e.g., research opportunities, office hours availability)


Use of RAG to retrieve and generate relevant information:

Retrieve the most relevant professor data based on the query
Generate a concise summary of each professor's strengths and potential drawbacks



Your Responsibilities:

Interpret the user's query accurately, considering both explicit and implicit requirements.
Use the RAG system to identify the top 3 most relevant professors based on the query.
For each professor, provide:

Name and basic information (department)
A brief summary of why they match the query (1-2 sentences)
Key strengths and potential drawbacks
An overall match score out of 10


Offer to provide more detailed information on any of the suggested professors if the user requests it.
If the query is too broad or vague, ask clarifying questions to refine the search.
Maintain objectivity and base your recommendations on factual data from your database.
Respect privacy by not sharing personal contact information or sensitive details about professors.

Your Interaction Style:

Be friendly and approachable, using a tone appropriate for college students.
Provide concise initial responses, with the option to elaborate if requested.
Be impartial and avoid showing preference for specific professors or institutions.
If you don't have enough information to answer a query, be honest about your limitations and suggest how the user might refine their search.

Remember, your goal is to help students make informed decisions about their professors based on accurate,
relevant information. Always strive to provide helpful, unbiased assistance."#;

/// Introductory label for the retrieved-results block.
const RESULTS_LABEL: &str = "Returned results from vector db (done automatically):";

/// Render the match sequence into a plain-text block.
///
/// Emits the fixed introductory label, then one entry per match in ranking
/// order with the professor identifier, subject, and star rating, each
/// separated by blank lines. An empty match list yields the label alone.
pub fn render_matches(matches: &[MatchRecord]) -> String {
    let mut block = format!("\n\n{}", RESULTS_LABEL);

    for record in matches {
        block.push_str(&format!(
            "\n\nProfessor: {}\n\nSubject: {}\n\nStars: {}",
            record.id, record.metadata.subject, record.metadata.stars
        ));
    }

    block
}

/// Build the outbound message list for the completion provider.
///
/// The result is the fixed system message, then every prior turn unchanged
/// and in order, then one user message carrying the final turn's content
/// with the rendered match block appended.
pub fn augment(prior: &[Message], last: &Message, matches: &[MatchRecord]) -> Vec<Message> {
    let mut outbound = Vec::with_capacity(prior.len() + 2);
    outbound.push(Message::system(SYSTEM_PROMPT));
    outbound.extend_from_slice(prior);
    outbound.push(Message::user(format!(
        "{}{}",
        last.content,
        render_matches(matches)
    )));
    outbound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ProfessorMetadata;
    use crate::message::Role;

    fn sample_match(id: &str, subject: &str, stars: f64) -> MatchRecord {
        MatchRecord {
            id: id.to_string(),
            score: 0.9,
            metadata: ProfessorMetadata {
                subject: subject.to_string(),
                stars,
            },
        }
    }

    #[test]
    fn test_outbound_shape() {
        let conversation = vec![
            Message::assistant("Hi!"),
            Message::user("Who teaches calculus?"),
        ];
        let (last, prior) = conversation.split_last().unwrap();
        let matches = vec![sample_match("Dr. Euler", "Calculus", 4.8)];

        let outbound = augment(prior, last, &matches);

        assert_eq!(outbound.len(), conversation.len() + 1);
        assert_eq!(outbound[0].role, Role::System);
        assert_eq!(outbound[0].content, SYSTEM_PROMPT);
        assert_eq!(outbound[1], conversation[0]);
        assert_eq!(outbound[2].role, Role::User);
    }

    #[test]
    fn test_retrieval_text_is_appended() {
        let last = Message::user("Find me a physics professor");
        let matches = vec![
            sample_match("Dr. Curie", "Physics", 4.9),
            sample_match("Dr. Feynman", "Physics", 4.7),
        ];

        let outbound = augment(&[], &last, &matches);
        let augmented = &outbound.last().unwrap().content;

        assert!(augmented.starts_with(&last.content));
        assert!(augmented.contains("Professor: Dr. Curie"));
        assert!(augmented.contains("Subject: Physics"));
        assert!(augmented.contains("Stars: 4.7"));
        // Ranking order is preserved in the rendered block.
        let curie = augmented.find("Dr. Curie").unwrap();
        let feynman = augmented.find("Dr. Feynman").unwrap();
        assert!(curie < feynman);
    }

    #[test]
    fn test_empty_matches_keep_label() {
        let block = render_matches(&[]);
        assert!(block.contains("Returned results from vector db"));
        assert!(!block.contains("Professor:"));
    }
}
