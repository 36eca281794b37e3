//! Nucleic acid bases, the standard genetic code and point mutations.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    T,
    U,
}

impl Base {
    pub const DNA: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    pub fn from_char(c: char) -> Option<Base> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' => Some(Base::T),
            'U' => Some(Base::U),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
            Base::U => 'U',
        }
    }

    /// Partner across a DNA double helix.
    pub fn dna_pair(self) -> Base {
        match self {
            Base::A => Base::T,
            Base::T | Base::U => Base::A,
            Base::C => Base::G,
            Base::G => Base::C,
        }
    }

    /// RNA base laid down opposite a base of the template strand.
    pub fn rna_pair(self) -> Base {
        match self {
            Base::A => Base::U,
            Base::T | Base::U => Base::A,
            Base::C => Base::G,
            Base::G => Base::C,
        }
    }

    /// Hydrogen bonds in the pair this base forms.
    pub fn bonds(self) -> u8 {
        match self {
            Base::A | Base::T | Base::U => 2,
            Base::C | Base::G => 3,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Base::A => Color::Rgb(255, 87, 51),
            Base::T => Color::Rgb(51, 255, 87),
            Base::C => Color::Rgb(51, 87, 255),
            Base::G => Color::Rgb(243, 255, 51),
            Base::U => Color::Rgb(255, 51, 241),
        }
    }

    /// Position in the U C A G order of the codon table. DNA T reads as U.
    fn code_index(self) -> usize {
        match self {
            Base::U | Base::T => 0,
            Base::C => 1,
            Base::A => 2,
            Base::G => 3,
        }
    }
}

/// Parse a strand, skipping anything that is not a base letter.
pub fn strand(text: &str) -> Vec<Base> {
    text.chars().filter_map(Base::from_char).collect()
}

pub fn letters(bases: &[Base]) -> String {
    bases.iter().map(|b| b.letter()).collect()
}

/// The other strand of the double helix.
pub fn complement(template: &[Base]) -> Vec<Base> {
    template.iter().map(|b| b.dna_pair()).collect()
}

/// mRNA copied off a template strand.
pub fn transcribe(template: &[Base]) -> Vec<Base> {
    template.iter().map(|b| b.rna_pair()).collect()
}

/// tRNA anticodon that pairs with an mRNA codon.
pub fn anticodon(codon: [Base; 3]) -> [Base; 3] {
    codon.map(Base::rna_pair)
}

/// Whole codons of an mRNA in reading frame from its first base.
pub fn codons(mrna: &[Base]) -> impl Iterator<Item = [Base; 3]> + '_ {
    mrna.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
}

impl AminoAcid {
    pub fn letter(self) -> char {
        use AminoAcid::*;
        match self {
            Ala => 'A',
            Arg => 'R',
            Asn => 'N',
            Asp => 'D',
            Cys => 'C',
            Gln => 'Q',
            Glu => 'E',
            Gly => 'G',
            His => 'H',
            Ile => 'I',
            Leu => 'L',
            Lys => 'K',
            Met => 'M',
            Phe => 'F',
            Pro => 'P',
            Ser => 'S',
            Thr => 'T',
            Trp => 'W',
            Tyr => 'Y',
            Val => 'V',
        }
    }

    pub fn name(self) -> &'static str {
        use AminoAcid::*;
        match self {
            Ala => "Alanine",
            Arg => "Arginine",
            Asn => "Asparagine",
            Asp => "Aspartate",
            Cys => "Cysteine",
            Gln => "Glutamine",
            Glu => "Glutamate",
            Gly => "Glycine",
            His => "Histidine",
            Ile => "Isoleucine",
            Leu => "Leucine",
            Lys => "Lysine",
            Met => "Methionine",
            Phe => "Phenylalanine",
            Pro => "Proline",
            Ser => "Serine",
            Thr => "Threonine",
            Trp => "Tryptophan",
            Tyr => "Tyrosine",
            Val => "Valine",
        }
    }

    pub fn color(self) -> Color {
        use AminoAcid::*;
        match self {
            Met => Color::Rgb(255, 87, 51),
            Phe | Trp | Tyr => Color::Rgb(51, 255, 87),
            Leu | Ile | Val | Ala => Color::Rgb(51, 87, 255),
            Ser | Thr | Asn | Gln | Cys => Color::Rgb(243, 255, 51),
            Lys | Arg | His => Color::Rgb(0, 255, 255),
            Asp | Glu => Color::Rgb(255, 69, 0),
            Gly | Pro => Color::Rgb(200, 200, 200),
        }
    }
}

/// What one codon means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residue {
    Amino(AminoAcid),
    Stop,
}

impl Residue {
    pub fn letter(self) -> char {
        match self {
            Residue::Amino(aa) => aa.letter(),
            Residue::Stop => '*',
        }
    }
}

/// One-letter residues in UUU, UUC, UUA ... GGG order.
const GENETIC_CODE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

fn residue(letter: u8) -> Residue {
    use AminoAcid::*;
    Residue::Amino(match letter {
        b'A' => Ala,
        b'R' => Arg,
        b'N' => Asn,
        b'D' => Asp,
        b'C' => Cys,
        b'Q' => Gln,
        b'E' => Glu,
        b'G' => Gly,
        b'H' => His,
        b'I' => Ile,
        b'L' => Leu,
        b'K' => Lys,
        b'M' => Met,
        b'F' => Phe,
        b'P' => Pro,
        b'S' => Ser,
        b'T' => Thr,
        b'W' => Trp,
        b'Y' => Tyr,
        b'V' => Val,
        _ => return Residue::Stop,
    })
}

pub fn decode(codon: [Base; 3]) -> Residue {
    let [a, b, c] = codon.map(Base::code_index);
    residue(GENETIC_CODE[a * 16 + b * 4 + c])
}

/// Residues read from the first base, through the first stop codon.
pub fn translate(mrna: &[Base]) -> Vec<Residue> {
    let mut chain = Vec::new();
    for codon in codons(mrna) {
        let r = decode(codon);
        chain.push(r);
        if r == Residue::Stop {
            break;
        }
    }
    chain
}

pub fn protein_letters(chain: &[Residue]) -> String {
    chain.iter().map(|r| r.letter()).collect()
}

/// A single-base change to a DNA strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Substitution { at: usize, base: Base },
    Insertion { at: usize, base: Base },
    Deletion { at: usize },
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::Substitution { .. } => "Substitution",
            Mutation::Insertion { .. } => "Insertion",
            Mutation::Deletion { .. } => "Deletion",
        }
    }

    /// Mutated copy of `dna`. An insertion past the end appends; other
    /// changes past the end do nothing.
    pub fn apply(&self, dna: &[Base]) -> Vec<Base> {
        let mut out = dna.to_vec();
        match *self {
            Mutation::Substitution { at, base } => {
                if let Some(b) = out.get_mut(at) {
                    *b = base;
                }
            }
            Mutation::Insertion { at, base } => out.insert(at.min(out.len()), base),
            Mutation::Deletion { at } => {
                if at < out.len() {
                    out.remove(at);
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consequence {
    Silent,
    Missense,
    Nonsense,
    Frameshift,
}

impl Consequence {
    pub fn label(self) -> &'static str {
        match self {
            Consequence::Silent => "silent",
            Consequence::Missense => "missense",
            Consequence::Nonsense => "nonsense",
            Consequence::Frameshift => "frameshift",
        }
    }
}

/// Effect on the protein of mutating a template strand.
pub fn consequence(template: &[Base], mutation: &Mutation) -> Consequence {
    let mutated = mutation.apply(template);
    if mutated.len() % 3 != template.len() % 3 {
        return Consequence::Frameshift;
    }
    let before = translate(&transcribe(template));
    let after = translate(&transcribe(&mutated));
    if before == after {
        Consequence::Silent
    } else if after.iter().zip(&before).any(|(a, b)| *a == Residue::Stop && *b != Residue::Stop) {
        Consequence::Nonsense
    } else {
        Consequence::Missense
    }
}
