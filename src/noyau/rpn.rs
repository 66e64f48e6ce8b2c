// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> arbre
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), en validant la grammaire au passage
// - Puis reconstruire l’arbre (Noeud)
//
// Règles:
// - Ident(name) suivi de '(' => appel (le nom est vérifié plus tard, à l’évaluation)
// - Ident(name) seul         => atome (variable ou constante)
// - '+'/'-' quand on attend une valeur => opérateur unaire (préfixe)
// - '**' associatif à droite, lie plus fort que le moins unaire à sa gauche :
//   "-2**2" => -(2**2), mais "2**-1" => 2**(-1)
//
// NOTE:
// - La validation se fait avec un seul drapeau `attend_valeur` : pas de
//   multiplication implicite ("2 3", "2(3)"), pas de virgule hors appel.

use tracing::trace;

use super::arbre::Noeud;
use super::erreur::{CalcError, Resultat};
use super::fonctions::{OpBinaire, OpUnaire};
use super::jetons::Tok;
use super::nombre::Nombre;

/// Profondeur maximale de l’arbre (garde-fou anti débordement de pile).
/// Une chaîne plate "1+1+…+1" compte un niveau par opérateur.
pub const PROFONDEUR_MAX: usize = 1000;

/// Élément de sortie RPN.
#[derive(Clone, Debug, PartialEq)]
pub enum ElemRpn {
    Num(Nombre),
    Atome(String),
    Binaire(OpBinaire),
    Unaire(OpUnaire),
    /// Appel : nom + nombre d’arguments.
    Appel(String, usize),
}

/// Élément de la pile d’opérateurs.
#[derive(Debug)]
enum Pile {
    Binaire(OpBinaire),
    Unaire(OpUnaire),
    /// '(' de regroupement
    Groupe,
    /// "nom(" : virgules comptées dans `virgules`
    Appel { nom: String, virgules: usize },
}

fn op_binaire(t: &Tok) -> Option<OpBinaire> {
    match t {
        Tok::Plus => Some(OpBinaire::Add),
        Tok::Minus => Some(OpBinaire::Sub),
        Tok::Star => Some(OpBinaire::Mul),
        Tok::Slash => Some(OpBinaire::Div),
        Tok::Percent => Some(OpBinaire::Mod),
        Tok::StarStar => Some(OpBinaire::Pow),
        _ => None,
    }
}

/// Dépile les opérateurs jusqu’à la prochaine parenthèse (groupe ou appel), exclue.
fn depiler_jusqu_a_parenthese(ops: &mut Vec<Pile>, out: &mut Vec<ElemRpn>) {
    while let Some(top) = ops.last() {
        match top {
            Pile::Groupe | Pile::Appel { .. } => break,
            Pile::Binaire(op) => out.push(ElemRpn::Binaire(*op)),
            Pile::Unaire(op) => out.push(ElemRpn::Unaire(*op)),
        }
        ops.pop();
    }
}

fn inattendu(t: &Tok) -> CalcError {
    let texte = super::jetons::format_tokens(std::slice::from_ref(t));
    CalcError::syntaxe(format!("jeton inattendu: '{texte}'"))
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Atome("pi"), Num(2), Binaire(Div), Appel("sin", 1)]
pub fn to_rpn(tokens: &[Tok]) -> Resultat<Vec<ElemRpn>> {
    let mut out: Vec<ElemRpn> = Vec::new();
    let mut ops: Vec<Pile> = Vec::new();

    // true au début, après un opérateur, après '(' ou ','
    let mut attend_valeur = true;
    // true juste après "nom(" : autorise l’appel sans argument "f()"
    let mut appel_ouvert = false;

    let mut iter = tokens.iter().peekable();
    while let Some(tok) = iter.next() {
        let vient_d_ouvrir = std::mem::take(&mut appel_ouvert);

        match tok {
            Tok::Num(n) => {
                if !attend_valeur {
                    return Err(inattendu(tok));
                }
                out.push(ElemRpn::Num(*n));
                attend_valeur = false;
            }

            Tok::Ident(nom) => {
                if !attend_valeur {
                    return Err(inattendu(tok));
                }
                if matches!(iter.peek(), Some(Tok::LPar)) {
                    iter.next();
                    ops.push(Pile::Appel {
                        nom: nom.clone(),
                        virgules: 0,
                    });
                    appel_ouvert = true;
                    // attend_valeur reste vrai
                } else {
                    out.push(ElemRpn::Atome(nom.clone()));
                    attend_valeur = false;
                }
            }

            Tok::LPar => {
                if !attend_valeur {
                    // "2(3)", "(a+b)(2)", "f(1)(2)" : appelé non réduit à un nom
                    return Err(CalcError::OnlySimpleCallsAllowed);
                }
                ops.push(Pile::Groupe);
            }

            Tok::Plus | Tok::Minus if attend_valeur => {
                let op = if matches!(tok, Tok::Minus) {
                    OpUnaire::Neg
                } else {
                    OpUnaire::Pos
                };
                // préfixe : ne dépile rien
                ops.push(Pile::Unaire(op));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Percent | Tok::StarStar => {
                if attend_valeur {
                    return Err(inattendu(tok));
                }
                let Some(op) = op_binaire(tok) else {
                    return Err(CalcError::UnsupportedOperator);
                };
                let p_tok = op.priorite();

                // dépile tant que la précédence/associativité l’exige
                while let Some(top) = ops.last() {
                    let p_top = match top {
                        Pile::Binaire(o) => o.priorite(),
                        Pile::Unaire(_) => OpUnaire::PRIORITE,
                        Pile::Groupe | Pile::Appel { .. } => break,
                    };
                    let doit_pop = if op.associatif_droite() {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };
                    if !doit_pop {
                        break;
                    }
                    match ops.pop() {
                        Some(Pile::Binaire(o)) => out.push(ElemRpn::Binaire(o)),
                        Some(Pile::Unaire(o)) => out.push(ElemRpn::Unaire(o)),
                        _ => break,
                    }
                }

                ops.push(Pile::Binaire(op));
                attend_valeur = true;
            }

            Tok::Comma => {
                if attend_valeur {
                    return Err(inattendu(tok));
                }
                depiler_jusqu_a_parenthese(&mut ops, &mut out);
                match ops.last_mut() {
                    Some(Pile::Appel { virgules, .. }) => *virgules += 1,
                    _ => return Err(CalcError::syntaxe("virgule hors d’un appel de fonction")),
                }
                attend_valeur = true;
            }

            Tok::RPar => {
                let appel_vide = vient_d_ouvrir;
                if attend_valeur && !appel_vide {
                    return Err(CalcError::syntaxe("expression attendue avant ')'"));
                }
                depiler_jusqu_a_parenthese(&mut ops, &mut out);
                match ops.pop() {
                    Some(Pile::Groupe) => {}
                    Some(Pile::Appel { nom, virgules }) => {
                        let argc = if appel_vide { 0 } else { virgules + 1 };
                        out.push(ElemRpn::Appel(nom, argc));
                    }
                    _ => return Err(CalcError::syntaxe("parenthèse fermante sans ouvrante")),
                }
                attend_valeur = false;
            }

            Tok::Interdit("~") => return Err(CalcError::UnsupportedUnaryOperator),
            Tok::Interdit(_) => return Err(CalcError::UnsupportedOperator),
        }
    }

    if attend_valeur {
        return Err(CalcError::syntaxe("expression incomplète"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match op {
            Pile::Binaire(o) => out.push(ElemRpn::Binaire(o)),
            Pile::Unaire(o) => out.push(ElemRpn::Unaire(o)),
            Pile::Groupe | Pile::Appel { .. } => {
                return Err(CalcError::syntaxe("parenthèses non fermées"))
            }
        }
    }

    trace!(elements = out.len(), "RPN construite");
    Ok(out)
}

/// Construit l’arbre à partir d’une RPN.
///
/// Itératif (pile explicite) ; la profondeur de chaque sous-arbre est suivie
/// pour refuser les arbres trop profonds avant toute récursion.
pub fn from_rpn(rpn: &[ElemRpn]) -> Resultat<Noeud> {
    let mut st: Vec<(Noeud, usize)> = Vec::new();

    let empiler = |st: &mut Vec<(Noeud, usize)>, n: Noeud, prof: usize| {
        if prof > PROFONDEUR_MAX {
            return Err(CalcError::syntaxe(format!(
                "expression trop imbriquée (profondeur > {PROFONDEUR_MAX})"
            )));
        }
        st.push((n, prof));
        Ok(())
    };

    for e in rpn.iter().cloned() {
        match e {
            ElemRpn::Num(v) => empiler(&mut st, Noeud::Nombre(v), 1)?,
            ElemRpn::Atome(nom) => empiler(&mut st, Noeud::Ident(nom), 1)?,

            ElemRpn::Binaire(op) => {
                let (b, pb) = st.pop().ok_or(CalcError::UnsupportedExpression)?;
                let (a, pa) = st.pop().ok_or(CalcError::UnsupportedExpression)?;
                let n = Noeud::Binaire(op, Box::new(a), Box::new(b));
                empiler(&mut st, n, pa.max(pb) + 1)?;
            }

            ElemRpn::Unaire(op) => {
                let (x, px) = st.pop().ok_or(CalcError::UnsupportedExpression)?;
                empiler(&mut st, Noeud::Unaire(op, Box::new(x)), px + 1)?;
            }

            ElemRpn::Appel(nom, argc) => {
                if st.len() < argc {
                    return Err(CalcError::UnsupportedExpression);
                }
                let args = st.split_off(st.len() - argc);
                let prof = args.iter().map(|(_, p)| *p).max().unwrap_or(0) + 1;
                let args = args.into_iter().map(|(n, _)| n).collect();
                empiler(&mut st, Noeud::Appel(nom, args), prof)?;
            }
        }
    }

    if st.len() != 1 {
        return Err(CalcError::UnsupportedExpression);
    }
    st.pop()
        .map(|(n, _)| n)
        .ok_or(CalcError::UnsupportedExpression)
}

/// Format utilitaire (“démarche”) : RPN en texte.
pub fn format_rpn(rpn: &[ElemRpn]) -> String {
    rpn.iter()
        .map(|e| match e {
            ElemRpn::Num(n) => n.to_string(),
            ElemRpn::Atome(nom) => nom.clone(),
            ElemRpn::Binaire(op) => op.symbole().to_string(),
            ElemRpn::Unaire(OpUnaire::Neg) => "neg".to_string(),
            ElemRpn::Unaire(OpUnaire::Pos) => "pos".to_string(),
            ElemRpn::Appel(nom, argc) => format!("{nom}/{argc}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
