// Integration tests for the warden crate
// Each test module should be publicly declared here
// Suites that pull in the shared mocks by path run as their own targets
