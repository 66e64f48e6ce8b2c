// src/noyau/jetons.rs

use super::erreur::{CalcError, Resultat};
use super::nombre::Nombre;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(Nombre),

    // Fonctions + variables + constantes.
    // NOTE: rpn.rs décidera si c’est un appel (suivi de '(') ou un atome.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar, // **

    LPar,
    RPar,
    Comma,

    // Opérateurs reconnus mais hors liste blanche (//, ^, &, |, <<, >>, @, ~).
    // On les lit pour pouvoir refuser avec un message précis.
    Interdit(&'static str),
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - entiers (ex: 12) et réels (ex: 1.5, .5, 5., 1e3, 2.5E-2)
/// - opérateurs + - * / % **
/// - parenthèses ( ) et virgule (arguments)
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]*
/// - π (équivaut à ident("pi")) et √ (équivaut à ident("sqrt"))
pub fn tokenize(s: &str) -> Resultat<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];
        let suivant = chars.get(i + 1).copied();

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Opérateurs à deux caractères d’abord
        let double = match (c, suivant) {
            ('*', Some('*')) => Some(Tok::StarStar),
            ('/', Some('/')) => Some(Tok::Interdit("//")),
            ('<', Some('<')) => Some(Tok::Interdit("<<")),
            ('>', Some('>')) => Some(Tok::Interdit(">>")),
            _ => None,
        };
        if let Some(t) = double {
            out.push(t);
            i += 2;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Comma),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            '^' => Some(Tok::Interdit("^")),
            '&' => Some(Tok::Interdit("&")),
            '|' => Some(Tok::Interdit("|")),
            '@' => Some(Tok::Interdit("@")),
            '~' => Some(Tok::Interdit("~")),
            'π' => Some(Tok::Ident("pi".to_string())),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]* (sensibles à la casse)
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && suivant.is_some_and(|d| d.is_ascii_digit())) {
            let (n, fin) = lire_nombre(&chars, i)?;
            out.push(Tok::Num(n));
            i = fin;
            continue;
        }

        return Err(CalcError::syntaxe(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Lit un littéral numérique à partir de `start`. Retourne (valeur, indice de fin).
fn lire_nombre(chars: &[char], start: usize) -> Resultat<(Nombre, usize)> {
    let chiffres = |mut i: usize| {
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = chiffres(start);
    let mut reel = false;

    if i < chars.len() && chars[i] == '.' {
        reel = true;
        i = chiffres(i + 1);
    }

    // exposant : seulement s’il est suivi de chiffres (sinon "1e" est refusé plus bas)
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            reel = true;
            i = chiffres(j);
        }
    }

    // "2x", "1e", "3.5.1" : littéral invalide (pas de multiplication implicite)
    if i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.') {
        let fin = chars[i..]
            .iter()
            .position(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.'))
            .map_or(chars.len(), |p| i + p);
        let texte: String = chars[start..fin].iter().collect();
        return Err(CalcError::syntaxe(format!("littéral numérique invalide: '{texte}'")));
    }

    let texte: String = chars[start..i].iter().collect();
    let invalide = || CalcError::syntaxe(format!("nombre invalide: '{texte}'"));

    let n = if reel {
        Nombre::Reel(texte.parse::<f64>().map_err(|_| invalide())?)
    } else {
        match texte.parse::<i64>() {
            Ok(v) => Nombre::Entier(v),
            // trop grand pour i64 : réel
            Err(_) => Nombre::Reel(texte.parse::<f64>().map_err(|_| invalide())?),
        }
    };
    Ok((n, i))
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(n) => n.to_string(),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::StarStar => "**".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Comma => ",".to_string(),

            Tok::Interdit(op) => op.to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
