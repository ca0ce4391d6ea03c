use crate::domain::model::{CategoryShare, JobPosting, RankedSkill, SkillTally};
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_TOP_N: usize = 50;
pub const OTHER_CATEGORY: &str = "Other";

/// Lower-cased alias -> canonical skill name.
const NORMALIZATIONS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("pytorch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    ("keras", "Keras"),
    ("scikit-learn", "scikit-learn"),
    ("sklearn", "scikit-learn"),
    ("aws", "AWS"),
    ("gcp", "GCP"),
    ("azure", "Azure"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("k8s", "Kubernetes"),
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("postgres", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("spark", "Apache Spark"),
    ("apache spark", "Apache Spark"),
    ("hadoop", "Hadoop"),
    ("kafka", "Kafka"),
    ("redis", "Redis"),
    ("git", "Git"),
    ("github", "GitHub"),
    ("gitlab", "GitLab"),
    ("linux", "Linux"),
    ("bash", "Bash"),
    ("java", "Java"),
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("typescript", "TypeScript"),
    ("ts", "TypeScript"),
    ("c++", "C++"),
    ("cpp", "C++"),
    ("c#", "C#"),
    ("csharp", "C#"),
    ("go", "Go"),
    ("golang", "Go"),
    ("rust", "Rust"),
    ("r", "R"),
    ("scala", "Scala"),
    ("julia", "Julia"),
    ("matlab", "MATLAB"),
    ("numpy", "NumPy"),
    ("pandas", "Pandas"),
    ("scipy", "SciPy"),
    ("matplotlib", "Matplotlib"),
    ("seaborn", "Seaborn"),
    ("plotly", "Plotly"),
    ("opencv", "OpenCV"),
    ("nltk", "NLTK"),
    ("spacy", "spaCy"),
    ("huggingface", "Hugging Face"),
    ("hugging face", "Hugging Face"),
    ("transformers", "Transformers"),
    ("langchain", "LangChain"),
    ("llama", "LLaMA"),
    ("gpt", "GPT"),
    ("openai", "OpenAI"),
    ("bert", "BERT"),
    ("fastapi", "FastAPI"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("react", "React"),
    ("vue", "Vue.js"),
    ("angular", "Angular"),
    ("node.js", "Node.js"),
    ("nodejs", "Node.js"),
    ("airflow", "Apache Airflow"),
    ("apache airflow", "Apache Airflow"),
    ("mlflow", "MLflow"),
    ("dvc", "DVC"),
    ("wandb", "Weights & Biases"),
    ("weights & biases", "Weights & Biases"),
    ("tableau", "Tableau"),
    ("power bi", "Power BI"),
    ("powerbi", "Power BI"),
    ("excel", "Excel"),
    ("jupyter", "Jupyter"),
    ("colab", "Google Colab"),
    ("google colab", "Google Colab"),
    ("sagemaker", "AWS SageMaker"),
    ("aws sagemaker", "AWS SageMaker"),
    ("vertex ai", "Vertex AI"),
    ("databricks", "Databricks"),
    ("snowflake", "Snowflake"),
    ("dbt", "dbt"),
    ("terraform", "Terraform"),
    ("ansible", "Ansible"),
    ("jenkins", "Jenkins"),
    ("ci/cd", "CI/CD"),
    ("cicd", "CI/CD"),
    ("agile", "Agile"),
    ("scrum", "Scrum"),
    ("jira", "Jira"),
    ("rag", "RAG"),
    ("llm", "LLM"),
    ("llms", "LLM"),
    ("nlp", "NLP"),
    ("cv", "Computer Vision"),
    ("computer vision", "Computer Vision"),
    ("deep learning", "Deep Learning"),
    ("reinforcement learning", "Reinforcement Learning"),
    ("rl", "Reinforcement Learning"),
    ("gan", "GANs"),
    ("gans", "GANs"),
    ("cnn", "CNN"),
    ("rnn", "RNN"),
    ("lstm", "LSTM"),
    ("attention", "Attention Mechanism"),
];

/// Category name -> canonical skills in it. Order decides lookup priority.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Programming Languages",
        &[
            "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Go", "Rust", "R", "Scala",
            "Julia", "MATLAB", "Bash",
        ],
    ),
    (
        "ML/AI Frameworks",
        &[
            "TensorFlow", "PyTorch", "Keras", "scikit-learn", "Hugging Face", "Transformers",
            "OpenCV", "NLTK", "spaCy", "LangChain",
        ],
    ),
    (
        "Cloud Platforms",
        &["AWS", "GCP", "Azure", "AWS SageMaker", "Vertex AI", "Databricks"],
    ),
    (
        "Data & Databases",
        &[
            "SQL", "MySQL", "PostgreSQL", "MongoDB", "Redis", "Snowflake", "Apache Spark",
            "Hadoop", "Kafka",
        ],
    ),
    (
        "DevOps & Tools",
        &[
            "Docker", "Kubernetes", "Git", "GitHub", "GitLab", "Jenkins", "CI/CD", "Terraform",
            "MLflow", "Apache Airflow", "dbt",
        ],
    ),
    (
        "Visualization",
        &["Tableau", "Power BI", "Matplotlib", "Seaborn", "Plotly"],
    ),
    (
        "AI/ML Concepts",
        &[
            "LLM", "NLP", "Computer Vision", "Deep Learning", "Reinforcement Learning", "RAG",
            "GANs", "CNN", "RNN", "LSTM", "BERT", "GPT",
        ],
    ),
];

pub fn normalize_skill(skill: &str) -> String {
    let trimmed = skill.trim();
    let lower = trimmed.to_lowercase();
    NORMALIZATIONS
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Counts each normalized skill at most once per job.
pub fn aggregate_skills<S: AsRef<str>>(all_skills: &[Vec<S>]) -> HashMap<String, usize> {
    let mut counter: HashMap<String, usize> = HashMap::new();

    for skills in all_skills {
        let unique: BTreeSet<String> = skills
            .iter()
            .map(|s| normalize_skill(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        for skill in unique {
            *counter.entry(skill).or_insert(0) += 1;
        }
    }

    counter
}

/// Most common first; equal counts are ordered by name.
pub fn rank_skills(
    skill_counts: &HashMap<String, usize>,
    total_jobs: usize,
    top_n: usize,
) -> Vec<RankedSkill> {
    let mut entries: Vec<(&String, &usize)> = skill_counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .into_iter()
        .take(top_n)
        .map(|(skill, &count)| RankedSkill {
            skill: skill.clone(),
            count,
            percentage: if total_jobs > 0 {
                count as f64 / total_jobs as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

pub fn categorize(skill: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|(_, skills)| skills.iter().any(|s| *s == skill))
        .map(|(category, _)| *category)
        .unwrap_or(OTHER_CATEGORY)
}

pub fn tally(ranked: &[RankedSkill]) -> Vec<SkillTally> {
    ranked
        .iter()
        .map(|r| SkillTally {
            name: r.skill.clone(),
            count: r.count,
            category: categorize(&r.skill).to_string(),
        })
        .collect()
}

/// Summed counts per category, largest first, with "Other" always last.
pub fn category_shares(ranked: &[RankedSkill]) -> Vec<CategoryShare> {
    let mut per_category: HashMap<&'static str, usize> = HashMap::new();
    let mut other = 0;

    for skill in ranked {
        match categorize(&skill.skill) {
            OTHER_CATEGORY => other += skill.count,
            category => *per_category.entry(category).or_insert(0) += skill.count,
        }
    }

    let mut shares: Vec<CategoryShare> = CATEGORIES
        .iter()
        .filter_map(|(category, _)| {
            per_category
                .get(category)
                .filter(|&&count| count > 0)
                .map(|&count| CategoryShare {
                    category: category.to_string(),
                    count,
                })
        })
        .collect();
    // 穩定排序，同數量保留分類表順序
    shares.sort_by(|a, b| b.count.cmp(&a.count));

    if other > 0 {
        shares.push(CategoryShare {
            category: OTHER_CATEGORY.to_string(),
            count: other,
        });
    }

    shares
}

/// Ranks skills across the jobs that have any; jobs without skills do not count.
pub fn analyze_skills(jobs: &[JobPosting], top_n: usize) -> (usize, Vec<RankedSkill>) {
    let all_skills: Vec<Vec<String>> = jobs
        .iter()
        .filter(|job| !job.skills.is_empty())
        .map(|job| job.skills.clone())
        .collect();

    if all_skills.is_empty() {
        tracing::warn!("No skills found to analyze");
        return (0, Vec::new());
    }

    let counts = aggregate_skills(&all_skills);
    let total_jobs = all_skills.len();
    (total_jobs, rank_skills(&counts, total_jobs, top_n))
}
