// src/metadata/technologies.rs
// =============================================================================
// Technology tag detection (frameworks, tools, domains).
//
// Passes, in order, each only adding tags not already present:
// 1. a "Technologies Used" style section, if the README has one
// 2. the whole README, if pass 1 found fewer than 2 tags
// 3. every bullet line
// 4. algorithm-related titles force "Algorithms" (and friends)
// 5. with fewer than 3 tags, the TECHNOLOGY_RULES cascade on the title
//
// The result is cut to MAX_TECHNOLOGIES, keeping the earliest tags.
// =============================================================================

use super::{
    apply_first_match, bullet_lines, compile_table, first_heading, push_unique, scan_into,
    section, DefaultRule, Pattern,
};
use regex::Regex;
use std::sync::OnceLock;

/// Upper bound on the number of technology tags per project.
pub const MAX_TECHNOLOGIES: usize = 5;

const TECHNOLOGY_PATTERNS: &[(&str, &str)] = &[
    // Machine Learning & AI
    ("TensorFlow", r"(?i)\bTensorFlow\b"),
    ("PyTorch", r"(?i)\bPyTorch\b"),
    ("Scikit-learn", r"(?i)\bScikit-learn\b|\bsklearn\b"),
    ("Keras", r"(?i)\bKeras\b"),
    ("Hugging Face", r"(?i)\bHugging Face\b|\bTransformers\b"),
    ("NLTK", r"(?i)\bNLTK\b"),
    ("SpaCy", r"(?i)\bSpaCy\b"),
    ("OpenAI", r"(?i)\bOpenAI\b|\bGPT\b"),
    ("LangChain", r"(?i)\bLangChain\b"),
    ("Llama", r"(?i)\bLlama\b"),
    // Data Science
    ("Pandas", r"(?i)\bPandas\b"),
    ("NumPy", r"(?i)\bNumPy\b"),
    ("Matplotlib", r"(?i)\bMatplotlib\b"),
    ("Seaborn", r"(?i)\bSeaborn\b"),
    ("Plotly", r"(?i)\bPlotly\b"),
    ("Jupyter", r"(?i)\bJupyter\b"),
    ("Data Analysis", r"(?i)\bData Analysis\b"),
    ("Data Visualization", r"(?i)\bData Visualization\b"),
    ("Statistical Analysis", r"(?i)\bStatistical Analysis\b"),
    // Web Development
    ("React", r"(?i)\bReact\b"),
    ("Angular", r"(?i)\bAngular\b"),
    ("Vue.js", r"(?i)\bVue\b"),
    ("Next.js", r"(?i)\bNext\.js\b"),
    ("Svelte", r"(?i)\bSvelte\b"),
    ("Django", r"(?i)\bDjango\b"),
    ("Flask", r"(?i)\bFlask\b"),
    ("FastAPI", r"(?i)\bFastAPI\b"),
    ("Spring", r"(?i)\bSpring\b"),
    ("Node.js", r"(?i)\bNode\.js\b|\bNodeJS\b"),
    ("Express", r"(?i)\bExpress\b"),
    ("HTML/CSS", r"(?i)\bHTML\b|\bCSS\b"),
    ("JavaScript", r"(?i)\bJavaScript\b|\bJS\b"),
    ("TypeScript", r"(?i)\bTypeScript\b|\bTS\b"),
    ("REST API", r"(?i)\bREST\b|\bRESTful\b|\bAPI\b"),
    ("GraphQL", r"(?i)\bGraphQL\b"),
    // Databases
    ("MongoDB", r"(?i)\bMongoDB\b"),
    ("MySQL", r"(?i)\bMySQL\b"),
    ("PostgreSQL", r"(?i)\bPostgreSQL\b"),
    ("SQLite", r"(?i)\bSQLite\b"),
    ("Redis", r"(?i)\bRedis\b"),
    ("Elasticsearch", r"(?i)\bElasticsearch\b"),
    ("SQL", r"(?i)\bSQL\b"),
    ("NoSQL", r"(?i)\bNoSQL\b"),
    // DevOps & Cloud
    ("Docker", r"(?i)\bDocker\b"),
    ("Kubernetes", r"(?i)\bKubernetes\b|\bK8s\b"),
    ("CI/CD", r"(?i)\bCI/CD\b|\bContinuous Integration\b|\bContinuous Deployment\b"),
    ("AWS", r"(?i)\bAWS\b|\bAmazon Web Services\b"),
    ("Azure", r"(?i)\bAzure\b|\bMicrosoft Azure\b"),
    ("Google Cloud", r"(?i)\bGCP\b|\bGoogle Cloud\b"),
    ("Terraform", r"(?i)\bTerraform\b"),
    ("Ansible", r"(?i)\bAnsible\b"),
    ("Jenkins", r"(?i)\bJenkins\b"),
    ("GitHub Actions", r"(?i)\bGitHub Actions\b"),
    // Domain-specific
    ("Machine Learning", r"(?i)\bMachine Learning\b|\bML\b"),
    ("Deep Learning", r"(?i)\bDeep Learning\b|\bDL\b"),
    ("Natural Language Processing", r"(?i)\bNLP\b|\bNatural Language Processing\b"),
    ("Computer Vision", r"(?i)\bComputer Vision\b|\bCV\b"),
    ("Reinforcement Learning", r"(?i)\bReinforcement Learning\b|\bRL\b"),
    ("Data Science", r"(?i)\bData Science\b"),
    ("Web Development", r"(?i)\bWeb Development\b|\bWeb Dev\b"),
    ("Mobile Development", r"(?i)\bMobile Development\b|\bMobile App\b"),
    ("Robotics", r"(?i)\bRobotics\b"),
    ("Blockchain", r"(?i)\bBlockchain\b"),
    ("Cryptography", r"(?i)\bCryptography\b|\bCrypto\b"),
    ("Financial APIs", r"(?i)\bFinancial API\b|\bFinance API\b"),
    ("Trading", r"(?i)\bTrading\b|\bAlgorithmic Trading\b"),
    ("Quantitative Finance", r"(?i)\bQuantitative Finance\b|\bQuant\b"),
    // Computer Science
    ("Algorithms", r"(?i)\bAlgorithm\b"),
    ("Data Structures", r"(?i)\bData Structures\b"),
    ("Sorting Algorithms", r"(?i)\bSorting Algorithm\b"),
    ("Runtime Analysis", r"(?i)\bRuntime Analysis\b|\bTime Complexity\b"),
    ("Multi-threading", r"(?i)\bMulti-thread\b|\bMultithreaded\b|\bParallel\b"),
    ("Distributed Systems", r"(?i)\bDistributed Systems\b|\bDistributed Computing\b"),
    ("System Design", r"(?i)\bSystem Design\b|\bArchitecture\b"),
    ("Object-Oriented Programming", r"(?i)\bOOP\b|\bObject-Oriented\b"),
    ("Functional Programming", r"(?i)\bFunctional Programming\b"),
    ("Design Patterns", r"(?i)\bDesign Patterns\b"),
    // Languages listed as a technology (scanned last)
    ("Python", r"(?i)\bPython\b"),
];

// Section headings, most specific first
const SECTION_HEADINGS: &[&str] = &[
    r"(?i)## Technologies Used",
    r"(?i)## Tools And Technologies",
    r"(?i)## Technologies",
];

fn technology_table() -> &'static [Pattern] {
    static TABLE: OnceLock<Vec<Pattern>> = OnceLock::new();
    TABLE.get_or_init(|| compile_table(TECHNOLOGY_PATTERNS))
}

fn section_headings() -> &'static [Regex] {
    static HEADINGS: OnceLock<Vec<Regex>> = OnceLock::new();
    HEADINGS.get_or_init(|| {
        SECTION_HEADINGS
            .iter()
            .map(|p| Regex::new(p).expect("section pattern must compile"))
            .collect()
    })
}

fn technologies_section(readme: &str) -> Option<&str> {
    section_headings()
        .iter()
        .find_map(|heading| section(readme, heading))
}

/// Determines up to MAX_TECHNOLOGIES technology tags from README text.
pub fn determine_technologies(readme: &str) -> Vec<String> {
    let mut technologies = Vec::new();
    let title = first_heading(readme).unwrap_or_default().to_lowercase();

    if !readme.is_empty() {
        let table = technology_table();

        if let Some(tech_section) = technologies_section(readme) {
            scan_into(table, tech_section, &mut technologies);
        }

        if technologies.len() < 2 {
            scan_into(table, readme, &mut technologies);
        }

        for bullet in bullet_lines(readme) {
            scan_into(table, bullet, &mut technologies);
        }

        if ["algorithm", "runtime", "analysis"]
            .iter()
            .any(|k| title.contains(k))
        {
            push_unique(&mut technologies, "Algorithms");
            if title.contains("sorting") {
                push_unique(&mut technologies, "Sorting Algorithms");
            }
            if title.contains("runtime") {
                push_unique(&mut technologies, "Runtime Analysis");
            }
        }
    }

    if technologies.len() < 3 {
        let hints = TechnologyHints { title_lower: title };
        if let Some(defaults) = apply_first_match(TECHNOLOGY_RULES, &hints) {
            for technology in defaults {
                push_unique(&mut technologies, &technology);
            }
        }
    }

    technologies.truncate(MAX_TECHNOLOGIES);
    technologies
}

/// What the default technology rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologyHints {
    /// First README heading, lowercased.
    pub title_lower: String,
}

impl TechnologyHints {
    fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.title_lower.contains(k))
    }
}

/// Fallback cascade for READMEs with fewer than 3 detected technologies.
pub static TECHNOLOGY_RULES: &[DefaultRule<TechnologyHints>] = &[
    DefaultRule {
        name: "ai",
        applies: ai_title,
        defaults: ai_defaults,
    },
    DefaultRule {
        name: "web",
        applies: web_title,
        defaults: web_defaults,
    },
    DefaultRule {
        name: "data",
        applies: data_title,
        defaults: data_defaults,
    },
    DefaultRule {
        name: "computer-science",
        applies: cs_title,
        defaults: cs_defaults,
    },
    DefaultRule {
        name: "generic",
        applies: always,
        defaults: generic_defaults,
    },
];

fn ai_title(h: &TechnologyHints) -> bool {
    h.mentions_any(&["ai", "machine learning", "neural", "deep learning", "nlp"])
}

fn web_title(h: &TechnologyHints) -> bool {
    h.mentions_any(&["web", "frontend", "backend", "app", "api"])
}

fn data_title(h: &TechnologyHints) -> bool {
    h.mentions_any(&["data", "analysis", "visualization"])
}

fn cs_title(h: &TechnologyHints) -> bool {
    h.mentions_any(&["algorithm", "data structure", "implementation"])
}

fn always(_: &TechnologyHints) -> bool {
    true
}

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn ai_defaults(_: &TechnologyHints) -> Vec<String> {
    tags(&["Machine Learning", "Data Science", "Python"])
}

fn web_defaults(_: &TechnologyHints) -> Vec<String> {
    tags(&["Web Development", "REST API", "JavaScript"])
}

fn data_defaults(_: &TechnologyHints) -> Vec<String> {
    tags(&["Data Analysis", "Data Visualization", "Statistical Analysis"])
}

fn cs_defaults(_: &TechnologyHints) -> Vec<String> {
    tags(&["Algorithms", "Data Structures", "Computer Science"])
}

fn generic_defaults(_: &TechnologyHints) -> Vec<String> {
    tags(&["Software Development", "Programming", "Computer Science"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::first_match;

    fn rule_for(title: &str) -> &'static str {
        let hints = TechnologyHints {
            title_lower: title.to_lowercase(),
        };
        first_match(TECHNOLOGY_RULES, &hints).unwrap().name
    }

    #[test]
    fn test_table_patterns_compile() {
        assert_eq!(technology_table().len(), TECHNOLOGY_PATTERNS.len());
        assert_eq!(section_headings().len(), 3);
    }

    #[test]
    fn test_technologies_used_section() {
        let readme = "# Project\n\nSome intro.\n\n## Technologies Used\n\n- Python\n- Machine Learning\n";
        let techs = determine_technologies(readme);
        assert!(techs.contains(&"Python".to_string()));
        assert!(techs.contains(&"Machine Learning".to_string()));
    }

    #[test]
    fn test_whole_document_without_section() {
        let readme = "# Project\n\nSome intro written in Python using Machine Learning.\n";
        let techs = determine_technologies(readme);
        assert!(techs.contains(&"Python".to_string()));
        assert!(techs.contains(&"Machine Learning".to_string()));
    }

    #[test]
    fn test_tools_and_technologies_heading() {
        let readme = "# Stack\n\n## Tools and Technologies\n\nDocker, Redis, PostgreSQL\n\n## Other\n\nReact";
        assert_eq!(
            determine_technologies(readme),
            vec!["PostgreSQL", "Redis", "Docker"]
        );
    }

    #[test]
    fn test_never_more_than_five() {
        let readme = "# Kitchen Sink\n\nTensorFlow PyTorch Keras Pandas NumPy Docker Redis React Django AWS";
        let techs = determine_technologies(readme);
        assert_eq!(techs.len(), MAX_TECHNOLOGIES);
        assert_eq!(techs, vec!["TensorFlow", "PyTorch", "Keras", "Pandas", "NumPy"]);
    }

    #[test]
    fn test_algorithm_title_forces_tags() {
        let readme = "# Sorting Runtime Study\n\nMeasures things.";
        let techs = determine_technologies(readme);
        assert_eq!(
            techs,
            vec!["Algorithms", "Sorting Algorithms", "Runtime Analysis"]
        );
    }

    #[test]
    fn test_defaults_fill_up_to_three() {
        // One tag detected, then the generic rule tops it up
        let readme = "# Toolbox\n\nUses Docker.";
        assert_eq!(
            determine_technologies(readme),
            vec!["Docker", "Software Development", "Programming", "Computer Science"]
        );
    }

    #[test]
    fn test_default_rules_precedence() {
        assert_eq!(rule_for("AI Hedge Fund"), "ai");
        assert_eq!(rule_for("Stock Tracking Application"), "web");
        assert_eq!(rule_for("Census Visualization"), "data");
        assert_eq!(rule_for("Dijkstra's Algorithm Implementation"), "computer-science");
        assert_eq!(rule_for("Hex Board"), "generic");
    }

    #[test]
    fn test_empty_readme_gets_generic_tags() {
        assert_eq!(
            determine_technologies(""),
            vec!["Software Development", "Programming", "Computer Science"]
        );
    }

    #[test]
    fn test_no_duplicates_across_passes() {
        let readme = "# Docker Notes\n\n## Technologies\n\n- Docker\n- Docker Compose\n\nDocker everywhere.";
        let techs = determine_technologies(readme);
        let docker = techs.iter().filter(|t| *t == "Docker").count();
        assert_eq!(docker, 1);
    }

    #[test]
    fn test_python_entry_counts_toward_default_threshold() {
        let fallback = crate::fallback::FallbackProvider::builtin().unwrap();
        let readme = fallback.readme("leetCode-solutions").unwrap();
        // Python plus two detected tags reaches three, so no default rule fires
        assert_eq!(
            determine_technologies(readme),
            vec!["Data Structures", "Python", "Algorithms"]
        );
    }
}
