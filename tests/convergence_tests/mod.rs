use std::path::PathBuf;


fn data_output_path() -> PathBuf {
    PathBuf::from("data/convergence_tests/")
}
