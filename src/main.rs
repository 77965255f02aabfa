use IonoKin::Examples::chemistry_examples::chem_examples;
use IonoKin::Utils::logger::init_logging;

pub fn main() {
    // task number as the first argument, verbosity as the second
    let mut args = std::env::args().skip(1);
    let task: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(0);
    let verbose: u8 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    init_logging(verbose);
    chem_examples(task);
}
