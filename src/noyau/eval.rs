//! Noyau : évaluation de l’arbre
//!
//! Parcours post-ordre (gauche entièrement avant droite, arguments de gauche à droite).
//! Seules les variantes fermées de `fonctions.rs` sont exécutables :
//! un nom de fonction inconnu est refusé AVANT d’évaluer ses arguments.
//!
//! Trace : une ligne "<description> -> <résultat>" par étape, seulement si demandée
//! (sinon vecteur vide, rien n’est formaté).

use super::arbre::Noeud;
use super::erreur::{CalcError, Resultat};
use super::fonctions::{Constante, Fonction};
use super::nombre::Nombre;
use super::variables::Variables;

struct Evaluateur<'a> {
    variables: &'a Variables,
    trace: Option<Vec<String>>,
}

impl Evaluateur<'_> {
    fn noter(&mut self, ligne: impl FnOnce() -> String) {
        if let Some(t) = self.trace.as_mut() {
            t.push(ligne());
        }
    }

    fn evaluer(&mut self, noeud: &Noeud) -> Resultat<Nombre> {
        match noeud {
            Noeud::Nombre(v) => {
                self.noter(|| format!("num: {v}"));
                Ok(*v)
            }

            Noeud::Ident(nom) => {
                if let Some(v) = self.variables.get(nom) {
                    self.noter(|| format!("var {nom} -> {v}"));
                    return Ok(v);
                }
                if let Some(c) = Constante::depuis_nom(nom) {
                    let v = c.valeur();
                    self.noter(|| format!("const {nom} -> {v}"));
                    return Ok(v);
                }
                Err(CalcError::UnknownIdentifier(nom.clone()))
            }

            Noeud::Binaire(op, a, b) => {
                let g = self.evaluer(a)?;
                let d = self.evaluer(b)?;
                let r = op.appliquer(g, d)?;
                self.noter(|| format!("{g} {} {d} -> {r}", op.nom_trace()));
                Ok(r)
            }

            Noeud::Unaire(op, x) => {
                let v = self.evaluer(x)?;
                let r = op.appliquer(v);
                self.noter(|| format!("{} {v} -> {r}", op.nom_trace()));
                Ok(r)
            }

            Noeud::Appel(nom, args) => {
                let f = Fonction::depuis_nom(nom)
                    .ok_or_else(|| CalcError::FunctionNotAllowed(nom.clone()))?;
                let valeurs = args
                    .iter()
                    .map(|a| self.evaluer(a))
                    .collect::<Resultat<Vec<_>>>()?;
                let r = f.appliquer(&valeurs)?;
                self.noter(|| {
                    let liste: Vec<String> = valeurs.iter().map(|v| v.to_string()).collect();
                    format!("{nom}({}) -> {r}", liste.join(", "))
                });
                Ok(r)
            }
        }
    }
}

/// API noyau : évalue un arbre avec les variables données.
/// Retourne (résultat, trace) ; trace vide si `trace == false`.
pub fn evaluate(noeud: &Noeud, variables: &Variables, trace: bool) -> Resultat<(Nombre, Vec<String>)> {
    let mut ev = Evaluateur {
        variables,
        trace: trace.then(Vec::new),
    };
    let r = ev.evaluer(noeud)?;
    Ok((r, ev.trace.unwrap_or_default()))
}
