use phf::{Map, phf_map};

/// A chemical element with its standard atomic weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub number: u8,
    /// Standard atomic weight in g/mol (mass number of the most stable isotope for
    /// elements without a stable one).
    pub weight: f64,
}

const fn el(symbol: &'static str, number: u8, weight: f64) -> Element {
    Element {
        symbol,
        number,
        weight,
    }
}

/// Elements 1 through 118, indexed by `atomic_number - 1`.
#[rustfmt::skip]
pub static ELEMENTS: [Element; 118] = [
    el("H", 1, 1.00794), el("He", 2, 4.002602), el("Li", 3, 6.941), el("Be", 4, 9.012182),
    el("B", 5, 10.811), el("C", 6, 12.0107), el("N", 7, 14.0067), el("O", 8, 15.9994),
    el("F", 9, 18.9984032), el("Ne", 10, 20.1797), el("Na", 11, 22.98977), el("Mg", 12, 24.305),
    el("Al", 13, 26.981538), el("Si", 14, 28.0855), el("P", 15, 30.973761), el("S", 16, 32.065),
    el("Cl", 17, 35.453), el("Ar", 18, 39.948), el("K", 19, 39.0983), el("Ca", 20, 40.078),
    el("Sc", 21, 44.95591), el("Ti", 22, 47.867), el("V", 23, 50.9415), el("Cr", 24, 51.9961),
    el("Mn", 25, 54.938049), el("Fe", 26, 55.845), el("Co", 27, 58.9332), el("Ni", 28, 58.6934),
    el("Cu", 29, 63.546), el("Zn", 30, 65.409), el("Ga", 31, 69.723), el("Ge", 32, 72.64),
    el("As", 33, 74.9216), el("Se", 34, 78.96), el("Br", 35, 79.904), el("Kr", 36, 83.798),
    el("Rb", 37, 85.4678), el("Sr", 38, 87.62), el("Y", 39, 88.90585), el("Zr", 40, 91.224),
    el("Nb", 41, 92.90638), el("Mo", 42, 95.94), el("Tc", 43, 98.0), el("Ru", 44, 101.07),
    el("Rh", 45, 102.9055), el("Pd", 46, 106.42), el("Ag", 47, 107.8682), el("Cd", 48, 112.411),
    el("In", 49, 114.818), el("Sn", 50, 118.71), el("Sb", 51, 121.76), el("Te", 52, 127.6),
    el("I", 53, 126.90447), el("Xe", 54, 131.293), el("Cs", 55, 132.90545), el("Ba", 56, 137.327),
    el("La", 57, 138.9055), el("Ce", 58, 140.116), el("Pr", 59, 140.90765), el("Nd", 60, 144.24),
    el("Pm", 61, 145.0), el("Sm", 62, 150.36), el("Eu", 63, 151.964), el("Gd", 64, 157.25),
    el("Tb", 65, 158.92534), el("Dy", 66, 162.5), el("Ho", 67, 164.93032), el("Er", 68, 167.259),
    el("Tm", 69, 168.93421), el("Yb", 70, 173.04), el("Lu", 71, 174.967), el("Hf", 72, 178.49),
    el("Ta", 73, 180.9479), el("W", 74, 183.84), el("Re", 75, 186.207), el("Os", 76, 190.23),
    el("Ir", 77, 192.217), el("Pt", 78, 195.078), el("Au", 79, 196.96655), el("Hg", 80, 200.59),
    el("Tl", 81, 204.3833), el("Pb", 82, 207.2), el("Bi", 83, 208.98038), el("Po", 84, 209.0),
    el("At", 85, 210.0), el("Rn", 86, 222.0), el("Fr", 87, 223.0), el("Ra", 88, 226.0),
    el("Ac", 89, 227.0), el("Th", 90, 232.0381), el("Pa", 91, 231.03588), el("U", 92, 238.02891),
    el("Np", 93, 237.0), el("Pu", 94, 244.0), el("Am", 95, 243.0), el("Cm", 96, 247.0),
    el("Bk", 97, 247.0), el("Cf", 98, 251.0), el("Es", 99, 252.0), el("Fm", 100, 257.0),
    el("Md", 101, 258.0), el("No", 102, 259.0), el("Lr", 103, 262.0), el("Rf", 104, 261.0),
    el("Db", 105, 262.0), el("Sg", 106, 266.0), el("Bh", 107, 264.0), el("Hs", 108, 277.0),
    el("Mt", 109, 268.0), el("Ds", 110, 281.0), el("Rg", 111, 272.0), el("Cn", 112, 285.0),
    el("Nh", 113, 284.0), el("Fl", 114, 289.0), el("Mc", 115, 288.0), el("Lv", 116, 293.0),
    el("Ts", 117, 294.0), el("Og", 118, 294.0),
];

/// Symbol lookup into [`ELEMENTS`]; values are entries of the table itself.
#[rustfmt::skip]
static SYMBOL_TO_ELEMENT: Map<&'static str, &'static Element> = phf_map! {
    "H" => &ELEMENTS[0], "He" => &ELEMENTS[1], "Li" => &ELEMENTS[2], "Be" => &ELEMENTS[3],
    "B" => &ELEMENTS[4], "C" => &ELEMENTS[5], "N" => &ELEMENTS[6], "O" => &ELEMENTS[7],
    "F" => &ELEMENTS[8], "Ne" => &ELEMENTS[9], "Na" => &ELEMENTS[10], "Mg" => &ELEMENTS[11],
    "Al" => &ELEMENTS[12], "Si" => &ELEMENTS[13], "P" => &ELEMENTS[14],
    "S" => &ELEMENTS[15], "Cl" => &ELEMENTS[16], "Ar" => &ELEMENTS[17],
    "K" => &ELEMENTS[18], "Ca" => &ELEMENTS[19], "Sc" => &ELEMENTS[20],
    "Ti" => &ELEMENTS[21], "V" => &ELEMENTS[22], "Cr" => &ELEMENTS[23],
    "Mn" => &ELEMENTS[24], "Fe" => &ELEMENTS[25], "Co" => &ELEMENTS[26],
    "Ni" => &ELEMENTS[27], "Cu" => &ELEMENTS[28], "Zn" => &ELEMENTS[29],
    "Ga" => &ELEMENTS[30], "Ge" => &ELEMENTS[31], "As" => &ELEMENTS[32],
    "Se" => &ELEMENTS[33], "Br" => &ELEMENTS[34], "Kr" => &ELEMENTS[35],
    "Rb" => &ELEMENTS[36], "Sr" => &ELEMENTS[37], "Y" => &ELEMENTS[38],
    "Zr" => &ELEMENTS[39], "Nb" => &ELEMENTS[40], "Mo" => &ELEMENTS[41],
    "Tc" => &ELEMENTS[42], "Ru" => &ELEMENTS[43], "Rh" => &ELEMENTS[44],
    "Pd" => &ELEMENTS[45], "Ag" => &ELEMENTS[46], "Cd" => &ELEMENTS[47],
    "In" => &ELEMENTS[48], "Sn" => &ELEMENTS[49], "Sb" => &ELEMENTS[50],
    "Te" => &ELEMENTS[51], "I" => &ELEMENTS[52], "Xe" => &ELEMENTS[53],
    "Cs" => &ELEMENTS[54], "Ba" => &ELEMENTS[55], "La" => &ELEMENTS[56],
    "Ce" => &ELEMENTS[57], "Pr" => &ELEMENTS[58], "Nd" => &ELEMENTS[59],
    "Pm" => &ELEMENTS[60], "Sm" => &ELEMENTS[61], "Eu" => &ELEMENTS[62],
    "Gd" => &ELEMENTS[63], "Tb" => &ELEMENTS[64], "Dy" => &ELEMENTS[65],
    "Ho" => &ELEMENTS[66], "Er" => &ELEMENTS[67], "Tm" => &ELEMENTS[68],
    "Yb" => &ELEMENTS[69], "Lu" => &ELEMENTS[70], "Hf" => &ELEMENTS[71],
    "Ta" => &ELEMENTS[72], "W" => &ELEMENTS[73], "Re" => &ELEMENTS[74],
    "Os" => &ELEMENTS[75], "Ir" => &ELEMENTS[76], "Pt" => &ELEMENTS[77],
    "Au" => &ELEMENTS[78], "Hg" => &ELEMENTS[79], "Tl" => &ELEMENTS[80],
    "Pb" => &ELEMENTS[81], "Bi" => &ELEMENTS[82], "Po" => &ELEMENTS[83],
    "At" => &ELEMENTS[84], "Rn" => &ELEMENTS[85], "Fr" => &ELEMENTS[86],
    "Ra" => &ELEMENTS[87], "Ac" => &ELEMENTS[88], "Th" => &ELEMENTS[89],
    "Pa" => &ELEMENTS[90], "U" => &ELEMENTS[91], "Np" => &ELEMENTS[92],
    "Pu" => &ELEMENTS[93], "Am" => &ELEMENTS[94], "Cm" => &ELEMENTS[95],
    "Bk" => &ELEMENTS[96], "Cf" => &ELEMENTS[97], "Es" => &ELEMENTS[98],
    "Fm" => &ELEMENTS[99], "Md" => &ELEMENTS[100], "No" => &ELEMENTS[101],
    "Lr" => &ELEMENTS[102], "Rf" => &ELEMENTS[103], "Db" => &ELEMENTS[104],
    "Sg" => &ELEMENTS[105], "Bh" => &ELEMENTS[106], "Hs" => &ELEMENTS[107],
    "Mt" => &ELEMENTS[108], "Ds" => &ELEMENTS[109], "Rg" => &ELEMENTS[110],
    "Cn" => &ELEMENTS[111], "Nh" => &ELEMENTS[112], "Fl" => &ELEMENTS[113],
    "Mc" => &ELEMENTS[114], "Lv" => &ELEMENTS[115], "Ts" => &ELEMENTS[116],
    "Og" => &ELEMENTS[117],
};

/// Looks up an element by symbol.
///
/// Matching is exact first; otherwise the symbol is normalized to the conventional
/// capitalization (`"CL"` and `"cl"` both resolve to chlorine).
pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    SYMBOL_TO_ELEMENT
        .get(symbol)
        .or_else(|| SYMBOL_TO_ELEMENT.get(normalize_symbol(symbol).as_str()))
        .copied()
}

/// Looks up an element by atomic number (1-118).
pub fn by_number(number: u8) -> Option<&'static Element> {
    ELEMENTS.get(usize::from(number).checked_sub(1)?)
}

pub fn atomic_number(symbol: &str) -> Option<u8> {
    by_symbol(symbol).map(|e| e.number)
}

pub fn atomic_weight(symbol: &str) -> Option<f64> {
    by_symbol(symbol).map(|e| e.weight)
}

pub fn symbol(number: u8) -> Option<&'static str> {
    by_number(number).map(|e| e.symbol)
}

pub fn weight(number: u8) -> Option<f64> {
    by_number(number).map(|e| e.weight)
}

fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
