//! Plain-text rendering of structured results for the terminal.

use paperdesk_core::analysis::{
    AnalysisResult, CitationReport, Concern, NoveltyReport, PlagiarismReport, RiskBand,
};
use paperdesk_core::review::{Recommendation, ReviewResult, ScoreBand};

fn band(score: f64) -> &'static str {
    match ScoreBand::from_score(score) {
        ScoreBand::Good => "good",
        ScoreBand::Fair => "fair",
        ScoreBand::Poor => "poor",
    }
}

fn bullets(lines: &mut Vec<String>, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("{heading}:"));
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}

pub fn review(review: &ReviewResult) -> String {
    let verdict = match review.recommendation() {
        Recommendation::Accept => "Accept",
        Recommendation::Revise => "Revise",
        Recommendation::Reject => "Reject",
    };
    let mut lines = vec![format!(
        "Overall score: {:.1}/10 ({})  Recommendation: {}",
        review.score,
        band(review.score),
        verdict
    )];
    if let Some(confidence) = review.confidence {
        lines.push(format!("Confidence: {confidence}"));
    }

    if let Some(scores) = &review.scores {
        lines.push(String::new());
        lines.push("Scores:".to_string());
        for (category, score) in scores {
            lines.push(format!("  {category:<16} {score:>4.1} ({})", band(*score)));
        }
    }

    bullets(&mut lines, "Strengths", &review.strengths);
    bullets(&mut lines, "Weaknesses", &review.weaknesses);
    bullets(&mut lines, "Suggestions", &review.suggestions);
    if let Some(recommendations) = &review.recommendations {
        bullets(&mut lines, "Recommendations", recommendations);
    }

    if let Some(detailed) = &review.detailed {
        for (category, text) in detailed {
            lines.push(String::new());
            lines.push(format!("[{category}]"));
            lines.push(text.clone());
        }
    }
    lines.join("\n")
}

pub fn analysis(result: &AnalysisResult) -> String {
    match result {
        AnalysisResult::Plagiarism(report) => plagiarism(report),
        AnalysisResult::Novelty(report) => novelty(report),
        AnalysisResult::Citation(report) => citation(report),
    }
}

fn plagiarism(report: &PlagiarismReport) -> String {
    let risk = match report.risk() {
        RiskBand::Low => "Low risk",
        RiskBand::Medium => "Medium risk",
        RiskBand::High => "High risk",
    };
    let mut lines = vec![format!(
        "Overall similarity: {:.0}% ({risk})",
        report.overall_score
    )];
    if report.matches.is_empty() {
        lines.push("No matching sources found.".to_string());
    }
    for m in &report.matches {
        let marker = match m.concern {
            Concern::Low => " ",
            Concern::Medium => "!",
            Concern::High => "!!",
        };
        lines.push(String::new());
        lines.push(format!(
            "{marker} {} ({:.0}% similar, {} concern)",
            m.source, m.similarity, m.concern
        ));
        lines.push(format!("    \"{}\"", m.text));
    }
    lines.join("\n")
}

fn novelty(report: &NoveltyReport) -> String {
    let mut lines = vec![format!("Novelty score: {:.0}/100", report.novelty_score)];
    for (category, assessment) in &report.analysis {
        lines.push(format!("  {category}: {assessment}"));
    }
    bullets(&mut lines, "Research gaps", &report.gaps);
    bullets(&mut lines, "Similar works", &report.similar_works);
    lines.join("\n")
}

fn citation(report: &CitationReport) -> String {
    let stats = &report.network_stats;
    let mut lines = vec![
        format!(
            "Papers: {}  Citations: {}  Average: {:.1}  h-index: {}",
            stats.total_papers, stats.total_citations, stats.average_citations, stats.h_index
        ),
    ];

    if !report.influential_papers.is_empty() {
        lines.push(String::new());
        lines.push("Influential papers:".to_string());
        for paper in &report.influential_papers {
            lines.push(format!(
                "  {} ({}) {} citations, centrality {:.2}",
                paper.title, paper.year, paper.citations, paper.centrality
            ));
        }
    }

    if !report.clusters.is_empty() {
        lines.push(String::new());
        lines.push("Clusters:".to_string());
        for cluster in &report.clusters {
            lines.push(format!(
                "  {} ({} papers, strength {:.0}%)",
                cluster.name,
                cluster.papers,
                cluster.strength * 100.0
            ));
        }
    }

    bullets(&mut lines, "Trends", &report.trends);
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperdesk_core::analysis::{InfluentialPaper, NetworkStats, PlagiarismMatch};
    use std::collections::BTreeMap;

    fn sample_review() -> ReviewResult {
        ReviewResult {
            score: 6.5,
            strengths: vec!["Clear motivation".into()],
            weaknesses: Vec::new(),
            suggestions: vec!["Add ablations".into()],
            recommendations: None,
            detailed: None,
            scores: Some(BTreeMap::from([
                ("clarity".to_string(), 8.0),
                ("novelty".to_string(), 5.5),
            ])),
            confidence: None,
        }
    }

    #[test]
    fn review_shows_verdict_and_bands() {
        let text = review(&sample_review());
        assert!(text.starts_with("Overall score: 6.5/10 (fair)  Recommendation: Revise"));
        assert!(text.contains("clarity           8.0 (good)"));
        assert!(text.contains("novelty           5.5 (poor)"));
        assert!(text.contains("  - Add ablations"));
        assert!(!text.contains("Weaknesses"));
        assert!(!text.contains("Confidence"));
    }

    #[test]
    fn plagiarism_lists_matches_with_concern() {
        let text = analysis(&AnalysisResult::Plagiarism(PlagiarismReport {
            overall_score: 35.0,
            matches: vec![PlagiarismMatch {
                source: "Smith 2020".into(),
                text: "deep nets generalize".into(),
                similarity: 72.0,
                concern: Concern::High,
            }],
        }));
        assert!(text.starts_with("Overall similarity: 35% (Medium risk)"));
        assert!(text.contains("!! Smith 2020 (72% similar, high concern)"));
    }

    #[test]
    fn empty_plagiarism_report_says_so() {
        let text = analysis(&AnalysisResult::Plagiarism(PlagiarismReport {
            overall_score: 3.0,
            matches: Vec::new(),
        }));
        assert!(text.contains("Low risk"));
        assert!(text.contains("No matching sources found."));
    }

    #[test]
    fn citation_report_includes_stats_and_clusters() {
        let text = analysis(&AnalysisResult::Citation(CitationReport {
            network_stats: NetworkStats {
                total_papers: 120,
                total_citations: 3400,
                average_citations: 28.3,
                h_index: 17,
            },
            influential_papers: vec![InfluentialPaper {
                title: "Attention Is All You Need".into(),
                year: 2017,
                citations: 90000,
                centrality: 0.91,
            }],
            clusters: vec![paperdesk_core::analysis::CitationCluster {
                name: "Transformers".into(),
                papers: 40,
                strength: 0.8,
            }],
            trends: Vec::new(),
        }));
        assert!(text.contains("h-index: 17"));
        assert!(text.contains("Attention Is All You Need (2017) 90000 citations"));
        assert!(text.contains("Transformers (40 papers, strength 80%)"));
    }
}
