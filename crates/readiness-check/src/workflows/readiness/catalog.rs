use serde::Serialize;

/// One bipolar statement pair. `left` is the aspirational statement, `right` its opposite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeQuestion {
    pub title: &'static str,
    pub left: &'static str,
    pub right: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enabler {
    pub id: u8,
    pub name: &'static str,
    pub themes: Vec<ThemeQuestion>,
}

/// Ordered, immutable set of enablers the questionnaire walks through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessCatalog {
    enablers: Vec<Enabler>,
}

impl ReadinessCatalog {
    pub fn standard() -> Self {
        Self {
            enablers: standard_enablers(),
        }
    }

    pub fn from_enablers(enablers: Vec<Enabler>) -> Self {
        Self { enablers }
    }

    pub fn enablers(&self) -> &[Enabler] {
        &self.enablers
    }

    pub fn enabler(&self, name: &str) -> Option<&Enabler> {
        self.enablers.iter().find(|enabler| enabler.name == name)
    }

    pub fn question_count(&self) -> usize {
        self.enablers.iter().map(|enabler| enabler.themes.len()).sum()
    }
}

const fn theme(title: &'static str, left: &'static str, right: &'static str) -> ThemeQuestion {
    ThemeQuestion { title, left, right }
}

fn standard_enablers() -> Vec<Enabler> {
    vec![
        Enabler {
            id: 1,
            name: "Strategic Vision & Value",
            themes: vec![
                theme(
                    "Purpose & Alignment",
                    "AI initiatives are tied to defined business outcomes and approved KPIs.",
                    "AI initiatives are launched without clear purpose or success criteria.",
                ),
                theme(
                    "Governance of Use Cases",
                    "Clear criteria exist for what should and should not be automated.",
                    "Automation decisions are made ad hoc with no risk/benefit analysis.",
                ),
                theme(
                    "Performance Review",
                    "AI objectives are reviewed in management meetings with KPI tracking.",
                    "AI projects operate outside performance review cycles.",
                ),
            ],
        },
        Enabler {
            id: 2,
            name: "Leadership & Accountability",
            themes: vec![
                theme(
                    "Roles & Ownership",
                    "Each AI system has a named owner and documented responsibility.",
                    "When AI issues arise, accountability is unclear.",
                ),
                theme(
                    "Leadership Behaviour",
                    "Leaders fund and model responsible AI decisions.",
                    "Leadership treats AI as a tech experiment without oversight.",
                ),
                theme(
                    "Escalation & Reporting",
                    "There is a defined path to report AI concerns or incidents.",
                    "AI incidents are handled informally or ignored.",
                ),
            ],
        },
        Enabler {
            id: 3,
            name: "Governance & Compliance (AIMS)",
            themes: vec![
                theme(
                    "Policy & Integration",
                    "A documented AI Management System integrates ISO and legal requirements.",
                    "No formal AI policy exists or it is not followed.",
                ),
                theme(
                    "Auditing & Evidence",
                    "Internal audits and evidence logs are maintained for AI systems.",
                    "There is no audit trail for AI activities.",
                ),
                theme(
                    "Compliance Alignment",
                    "Controls map to ISO and EU AI Act articles.",
                    "Compliance activities for AI are fragmented or reactive.",
                ),
            ],
        },
        Enabler {
            id: 4,
            name: "Risk & Impact Management",
            themes: vec![
                theme(
                    "Assessment Process",
                    "AI risk and impact assessments are performed before and after deployment.",
                    "Risk assessments are skipped or done once then forgotten.",
                ),
                theme(
                    "Risk Coverage",
                    "Risks include individual, societal, and ethical impacts.",
                    "Only technical risks (like accuracy) are considered.",
                ),
                theme(
                    "Monitoring & Review",
                    "Post-market monitoring detects model drift and harm.",
                    "There is no system to monitor AI impacts after release.",
                ),
            ],
        },
        Enabler {
            id: 5,
            name: "Data Stewardship & Quality",
            themes: vec![
                theme(
                    "Provenance & Rights",
                    "Data sources, rights and provenance are documented and verifiable.",
                    "Datasets of unknown origin or licensing are used.",
                ),
                theme(
                    "Quality & Bias",
                    "Data is tested for bias and quality throughout the lifecycle.",
                    "Bias and quality issues go undetected until failures occur.",
                ),
                theme(
                    "Retention & Deletion",
                    "Data retention and deletion follow policy and law.",
                    "Data is kept indefinitely without control.",
                ),
            ],
        },
        Enabler {
            id: 6,
            name: "Clarity & Transparency",
            themes: vec![
                theme(
                    "User Disclosure",
                    "Users are informed when interacting with AI and understand its limits.",
                    "Users are not told when AI is used or its limitations.",
                ),
                theme(
                    "Documentation & Traceability",
                    "Technical and user documentation is complete and up-to-date.",
                    "Documentation is missing or inaccessible.",
                ),
                theme(
                    "Logging & Explainability",
                    "Event logs support traceability and explainability.",
                    "Logs are incomplete or unavailable for investigation.",
                ),
            ],
        },
        Enabler {
            id: 7,
            name: "Human Oversight & Skills",
            themes: vec![
                theme(
                    "Human-in-the-Loop",
                    "Humans review AI outputs before critical decisions.",
                    "Critical decisions are fully automated.",
                ),
                theme(
                    "Training & Competence",
                    "Teams receive training on AI risk, ethics and oversight.",
                    "No formal training on AI oversight exists.",
                ),
                theme(
                    "Diversity of Expertise",
                    "Cross-functional skills (data, domain, ethics) involved.",
                    "AI projects run by a single technical team without input.",
                ),
            ],
        },
        Enabler {
            id: 8,
            name: "Secure & Private by Design",
            themes: vec![
                theme(
                    "Security Controls",
                    "Security testing covers AI-specific threats (poisoning, leaks).",
                    "AI systems use generic IT controls without AI threat testing.",
                ),
                theme(
                    "Privacy Management",
                    "PII handling complies with data-protection roles and laws.",
                    "AI processes personal data without defined responsibility.",
                ),
                theme(
                    "Incident Response",
                    "Security and privacy incidents are reported and analysed.",
                    "AI security breaches are under-reported or ignored.",
                ),
            ],
        },
        Enabler {
            id: 9,
            name: "Lifecycle Ops & Monitoring",
            themes: vec![
                theme(
                    "Process Control",
                    "The AI lifecycle is documented (design \u{2192} deploy \u{2192} retire).",
                    "Models are released without defined lifecycle control.",
                ),
                theme(
                    "Rollback & Change Mgmt",
                    "Tested rollback and change procedures exist.",
                    "No rollback plans; changes made directly in production.",
                ),
                theme(
                    "Performance Tracking",
                    "KPIs and drift metrics monitored in production.",
                    "Model performance is not tracked post-launch.",
                ),
            ],
        },
        Enabler {
            id: 10,
            name: "Third-Party & Customer Alignment",
            themes: vec![
                theme(
                    "Supplier Governance",
                    "Supplier AI responsibilities are defined in contracts.",
                    "Vendors provide AI without clear accountability.",
                ),
                theme(
                    "Customer Transparency",
                    "Customers receive AI documentation and safe-use guidance.",
                    "Customers are not informed about AI functions or limits.",
                ),
                theme(
                    "Feedback & Improvement",
                    "External feedback feeds into AI risk and improvement cycles.",
                    "Customer issues are ignored or handled off-record.",
                ),
            ],
        },
    ]
}
