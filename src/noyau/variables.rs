// src/noyau/variables.rs
//
// Liaisons nom -> valeur d’une session.
// Ordre d’insertion conservé pour l’affichage (:vars) ; une ré-affectation
// garde la position d’origine.

use std::collections::HashMap;

use super::nombre::Nombre;

#[derive(Clone, Debug, Default)]
pub struct Variables {
    valeurs: HashMap<String, Nombre>,
    ordre: Vec<String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, nom: &str) -> Option<Nombre> {
        self.valeurs.get(nom).copied()
    }

    pub fn contains(&self, nom: &str) -> bool {
        self.valeurs.contains_key(nom)
    }

    pub fn inserer(&mut self, nom: &str, valeur: Nombre) {
        if self.valeurs.insert(nom.to_string(), valeur).is_none() {
            self.ordre.push(nom.to_string());
        }
    }

    pub fn retirer(&mut self, nom: &str) -> Option<Nombre> {
        let v = self.valeurs.remove(nom)?;
        self.ordre.retain(|n| n != nom);
        Some(v)
    }

    pub fn vider(&mut self) {
        self.valeurs.clear();
        self.ordre.clear();
    }

    pub fn len(&self) -> usize {
        self.ordre.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordre.is_empty()
    }

    /// Parcours dans l’ordre d’insertion.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Nombre)> + '_ {
        self.ordre
            .iter()
            .filter_map(|n| self.valeurs.get(n).map(|v| (n.as_str(), *v)))
    }
}
