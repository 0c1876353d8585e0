//! French prose report built from the triage triple.
//!
//! Three shapes: insufficient information (nothing recognized), symptoms
//! without a disease match, and the full ranked report. A non-empty alert is
//! always placed first, above a separator line.

use std::sync::Arc;

use crate::knowledge::KnowledgeBase;
use crate::models::SeverityTier;
use crate::pipeline::matching::MatchResult;

/// Advice shown for a condition whose record carries none.
pub const DEFAULT_ADVICE: &str = "Consultez un médecin pour un diagnostic précis.";

const MAX_TYPICAL_SYMPTOMS: usize = 5;

/// Personalised advice, shown when any trigger occurs in the joined symptoms.
struct AdviceBlock {
    triggers: &'static [&'static str],
    heading: &'static str,
    tips: &'static [&'static str],
}

static ADVICE_BLOCKS: &[AdviceBlock] = &[
    AdviceBlock {
        triggers: &["fièvre", "frissons", "température"],
        heading: "**Pour la fièvre :**",
        tips: &[
            "• **Surveillance** : Prenez votre température 3 fois par jour",
            "• **Hydratation** : Buvez au moins 2L d'eau par jour",
            "• **Repos** : Évitez les efforts physiques importants",
            "• **Confort** : Portez des vêtements légers, aérez la pièce",
        ],
    },
    AdviceBlock {
        triggers: &["toux", "difficulté à respirer", "essoufflement", "oppression"],
        heading: "**Pour les symptômes respiratoires :**",
        tips: &[
            "• **Environnement** : Évitez tabac, pollution, air froid",
            "• **Expectorations** : Buvez des boissons chaudes (tisanes, bouillon)",
            "• **Respiration** : Surélevez votre tête la nuit avec des oreillers",
            "• **Humidité** : Utilisez un humidificateur si l'air est sec",
        ],
    },
    AdviceBlock {
        triggers: &["nausées", "vomissements", "diarrhée", "gastro"],
        heading: "**Pour les troubles digestifs :**",
        tips: &[
            "• **Alimentation** : Diète hydrique (riz blanc, carottes cuites, bouillon)",
            "• **Surveillance** : Signes de déshydratation (bouche sèche, urines foncées)",
            "• **Évitez** : Laitages, fibres, aliments gras, café, alcool",
            "• **Fréquence** : Mangez de petites quantités fréquemment",
        ],
    },
    AdviceBlock {
        triggers: &["douleur", "mal", "courbature"],
        heading: "**Pour la gestion de la douleur :**",
        tips: &[
            "• **Repos** : Évitez les activités qui aggravent la douleur",
            "• **Chaud/Froid** : Appliquez de la glace pour les inflammations, du chaud pour les raideurs",
            "• **Position** : Adoptez une position confortable",
            "• **Médicaments** : Ne prenez que ceux prescrits ou conseillés par un pharmacien",
        ],
    },
];

const GENERAL_ADVICE: &[&str] = &[
    "• **Suivi** : Notez l'évolution de vos symptômes dans un carnet",
    "• **Médicaments** : Ne prenez pas d'auto-médication sans avis professionnel",
    "• **Communication** : Informez votre entourage de votre état",
    "• **Temps** : Accordez à votre corps le temps de récupérer",
    "• **Nutrition** : Maintenez une alimentation équilibrée autant que possible",
];

const MEDICAL_DISCLAIMER: &[&str] = &[
    "• **Ceci est une aide préliminaire,** pas un diagnostic médical",
    "• **Consultez un professionnel de santé** pour un diagnostic précis",
    "• **En cas d'aggravation,** contactez immédiatement le 15 (SAMU)",
    "• **Préparez votre consultation** avec la liste de vos symptômes",
    "• **Mentionnez** tous les médicaments que vous prenez",
    "• **Historique** : Notez vos antécédents médicaux importants",
];

pub struct ResponseComposer {
    knowledge_base: Arc<KnowledgeBase>,
}

impl ResponseComposer {
    pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    /// Compose the report. `alert` is the rendered urgency verdict, empty when none.
    pub fn compose(&self, symptoms: &[String], matches: &MatchResult, alert: &str) -> String {
        let mut lines = Vec::new();
        if !alert.is_empty() {
            lines.push(alert.to_string());
            lines.push(format!("\n{}\n", "=".repeat(50)));
        }

        match (symptoms.is_empty(), matches.is_empty()) {
            (true, true) => insufficient_information(&mut lines),
            (false, true) => unmatched_symptoms(&mut lines, symptoms),
            _ => self.full_report(&mut lines, symptoms, matches),
        }

        lines.join("\n")
    }

    fn full_report(&self, lines: &mut Vec<String>, symptoms: &[String], matches: &MatchResult) {
        lines.push("**Merci pour votre description détaillée.**".into());
        lines.push(format!(
            "\nJ'ai identifié **{} symptôme(s)** et voici mon analyse préliminaire :",
            symptoms.len()
        ));

        if !symptoms.is_empty() {
            lines.push("\n**Symptômes détectés :**".into());
            lines.extend(symptoms.iter().map(|s| format!("• {s}")));
        }

        lines.push("\n**Analyses possibles (par ordre de probabilité) :**".into());
        for (rank, m) in matches.iter().enumerate() {
            let record = self.knowledge_base.get(&m.disease);
            let tier = record.map_or(SeverityTier::Unknown, |r| r.severity);
            let advice = record
                .and_then(|r| r.advice.as_deref())
                .unwrap_or(DEFAULT_ADVICE);

            lines.push("\n---".into());
            lines.push(format!(
                "**{} {}. {}**",
                tier.emoji(),
                rank + 1,
                m.disease.to_uppercase()
            ));
            lines.push(format!(
                "**Niveau de confiance :** {:.0}%",
                display_confidence(m.score)
            ));
            lines.push(format!(
                "**Niveau de gravité :** {} {}",
                tier.title(),
                tier.icon()
            ));

            if let Some(typical) = record.map(|r| &r.symptoms).filter(|s| !s.is_empty()) {
                lines.push("**Symptômes typiques :**".into());
                lines.extend(
                    typical
                        .iter()
                        .take(MAX_TYPICAL_SYMPTOMS)
                        .map(|s| format!("  • {s}")),
                );
                if typical.len() > MAX_TYPICAL_SYMPTOMS {
                    lines.push(format!(
                        "  • ... et {} autre(s)",
                        typical.len() - MAX_TYPICAL_SYMPTOMS
                    ));
                }
            }

            lines.push(format!("**Conseils pratiques :** {advice}"));
        }

        lines.push("\n---".into());
        lines.push("**RECOMMANDATIONS PERSONNALISÉES**".into());
        let joined = symptoms.join(" ").to_lowercase();
        for block in ADVICE_BLOCKS
            .iter()
            .filter(|b| b.triggers.iter().any(|t| joined.contains(t)))
        {
            lines.push(format!("\n{}", block.heading));
            lines.extend(block.tips.iter().map(|t| t.to_string()));
        }

        lines.push("\n---".into());
        lines.push("**CONSEILS GÉNÉRAUX**".into());
        lines.extend(GENERAL_ADVICE.iter().map(|t| t.to_string()));

        lines.push("\n---".into());
        lines.push("**AVERTISSEMENT MÉDICAL IMPORTANT**".into());
        lines.extend(MEDICAL_DISCLAIMER.iter().map(|t| t.to_string()));

        lines.push("\n---".into());
        lines.push("*Je vous souhaite un bon rétablissement.*".into());
        lines.push("*L'équipe MedBot*".into());
    }
}

/// Raw cosine similarity shown as a percentage, capped at 99.
fn display_confidence(score: f64) -> f64 {
    (score * 100.0).min(99.0)
}

fn insufficient_information(lines: &mut Vec<String>) {
    lines.extend(
        [
            "**Je note votre description.** ",
            "\nJe n'ai pas pu identifier clairement des symptômes spécifiques. ",
            "\n**Pour une analyse plus précise :**",
            "• **Soyez plus spécifique** sur ce que vous ressentez",
            "• **Mentionnez la durée** des symptômes",
            "• **Précisez la localisation** des douleurs",
            "• **Décrivez l'intensité** (léger, modéré, sévère)",
            "\n*Exemple optimal :* « J'ai une fièvre à 38.5°C depuis 2 jours avec des maux de tête pulsatile »",
        ]
        .map(String::from),
    );
}

fn unmatched_symptoms(lines: &mut Vec<String>, symptoms: &[String]) {
    lines.push("**Merci pour votre description.**".into());
    lines.push(format!("\nJ'ai identifié {} symptôme(s) :", symptoms.len()));
    lines.extend(
        symptoms
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {s}", i + 1)),
    );
    lines.extend(
        [
            "\n**Cependant, je n'ai pas pu faire de correspondance claire avec une maladie spécifique.**",
            "\n**Recommandations :**",
            "• Consultez un médecin pour un examen complet",
            "• Surveillez l'évolution de vos symptômes",
            "• Notez tout nouveau symptôme qui apparaîtrait",
        ]
        .map(String::from),
    );
}
