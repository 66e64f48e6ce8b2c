//! Calculatrice sûre : noyau d’évaluation (liste blanche) + session.
//!
//! L’interface graphique (eframe) vit dans le binaire (src/main.rs, src/app/).

pub mod noyau;
